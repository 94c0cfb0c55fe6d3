extern crate argparse;
extern crate styledtext;
use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use std::io;
use std::io::{Read, Write};

use styledtext::{AttributeSet, StyledText};

fn describe_runs(text: &StyledText) -> String {
    let mut result = String::new();
    for run in text.runs() {
        result.push_str(&format!(
            "{}..{} {:?}: {:?}\n",
            run.start,
            run.end,
            &text.text()[run.range()],
            run.attributes
        ));
    }
    result
}

fn translate<R>(mut input: R, runs: bool, plain: bool, range: Option<(usize, usize)>) -> String
where
    R: io::Read,
{
    let mut markup = String::new();
    input
        .read_to_string(&mut markup)
        .expect("Failed to read input");
    let markup = markup.trim_end_matches('\n');
    let text = styledtext::parse_or_wrap(&AttributeSet::new(), markup, true, None);
    if runs {
        describe_runs(&text)
    } else if plain {
        text.text().to_string()
    } else if let Some((start, end)) = range {
        match styledtext::write_range(&text, start, end.min(text.len())) {
            Ok(written) => written,
            Err(e) => format!("Error: {}", e),
        }
    } else {
        styledtext::write(&text)
    }
}

fn main() {
    env_logger::init();

    let mut infile: Option<String> = None;
    let mut outfile: Option<String> = None;
    let mut runs = false;
    let mut plain = false;
    let mut start: Option<usize> = None;
    let mut end: usize = usize::MAX;

    {
        let mut ap = ArgumentParser::new();
        ap.refer(&mut infile).add_argument(
            "infile",
            StoreOption,
            "Input markup file (default is standard input)",
        );
        ap.refer(&mut outfile).add_option(
            &["-o", "--output"],
            StoreOption,
            "Output file (default is standard output)",
        );
        ap.refer(&mut runs)
            .add_option(&["-r", "--runs"], StoreTrue, "List the style runs");
        ap.refer(&mut plain)
            .add_option(&["-p", "--plain"], StoreTrue, "Output only the plain text");
        ap.refer(&mut start).add_option(
            &["-s", "--start"],
            StoreOption,
            "Write only from this byte offset",
        );
        ap.refer(&mut end).add_option(
            &["-e", "--end"],
            Store,
            "Write only up to this byte offset (with --start)",
        );
        ap.parse_args_or_exit();
    }

    let range = start.map(|start| (start, end));
    let data = match infile {
        None => {
            let stdin = io::stdin();
            translate(stdin.lock(), runs, plain, range)
        }
        Some(name) => {
            let file = std::fs::File::open(name).expect("Tried to open file");
            translate(file, runs, plain, range)
        }
    };

    match outfile {
        None => {
            println!("{}", data);
        }
        Some(name) => {
            let mut file = std::fs::File::create(name).expect("Tried to create file");
            write!(file, "{}", data).unwrap();
        }
    };
}
