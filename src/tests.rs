use std::sync::Arc;

use crate::attributes::{AttributeSet, Posture, Script, Weight};
use crate::colour::Colour;
use crate::fonts::FontFamilies;
use crate::hyperlink::{HyperlinkKind, ParamValue};
use crate::styled_text::{Run, StyledText};
use crate::{config, Error};

use super::{parse, parse_or_wrap, write, write_range};

/// Like assert_eq!(), but prints out the results normally as well
macro_rules! assert_eq_str {
    ($a:expr, $b:expr) => {
        if $a != $b {
            println!("<<<\n{}===\n{}>>>", $a, $b);
            assert_eq!($a, $b);
        }
    };
}
#[track_caller]
fn parse_plain(markup: &str) -> StyledText {
    parse(&AttributeSet::new(), markup, None).unwrap()
}
/// Parse and write back, expecting `expected`.
#[track_caller]
fn test_rewrite(markup: &str, expected: &str) {
    let output = write(&parse_plain(markup));
    assert_eq_str!(output, expected);
}
/// Parse and write back, expecting the input again.
#[track_caller]
fn test_roundtrip(markup: &str) {
    test_rewrite(markup, markup);
}
#[track_caller]
fn test_parse_err(markup: &str) -> Error {
    let err = parse(&AttributeSet::new(), markup, None).unwrap_err();
    let wrapped = parse_or_wrap(&AttributeSet::new(), markup, true, None);
    assert_eq_str!(wrapped.text(), markup);
    assert!(wrapped.runs().is_empty());
    err
}

#[test]
fn test_plain_text() {
    let text = parse_plain("plain text");
    assert_eq!(text.text(), "plain text");
    assert!(text.runs().is_empty());

    let text = parse_or_wrap(&AttributeSet::new(), "a <b>b</b>", false, Some("de_DE"));
    assert_eq!(text.text(), "a <b>b</b>");
    assert!(text.runs().is_empty());
    assert_eq!(text.locale(), Some("de_DE"));
}

#[test]
fn test_bold_and_italic() {
    let text = parse_plain("<b>bold</b> and <i>italic</i>");
    assert_eq!(text.text(), "bold and italic");
    assert_eq!(
        text.runs(),
        &[
            Run::new(AttributeSet::new().with_weight(Weight::Bold), 0, 4),
            Run::new(AttributeSet::new().with_posture(Posture::Oblique), 9, 15),
        ]
    );
}

#[test]
fn test_tag_case() {
    let text = parse_plain("<B>x</B><Sup>2</Sup>");
    assert_eq!(text.attributes_at(0).weight, Some(Weight::Bold));
    assert_eq!(text.attributes_at(1).script, Some(Script::Super));
    assert!(matches!(
        test_parse_err("<STYLE isBold=\"true\">x</STYLE>"),
        Error::UnknownTag(name) if name == "STYLE"
    ));
}

#[test]
fn test_style_attributes() {
    let text = parse_plain(
        "<style fontName=\"Serif\" isBold=\"TRUE\" isItalic=\"no\" isUnderline=\"true\" \
         isStrikeThrough=\"true\" size=\" 10.5 \" pdfFontName=\"Helvetica\" pdfEncoding=\"Cp1252\" \
         isPdfEmbedded=\"true\" forecolor=\"red\" backcolor=\"#00FF00\">x</style>",
    );
    let attrs = text.attributes_at(0);
    assert_eq!(attrs.family.as_deref(), Some("Serif"));
    assert_eq!(attrs.weight, Some(Weight::Bold));
    assert_eq!(attrs.posture, Some(Posture::Regular));
    assert_eq!(attrs.underline, Some(true));
    assert_eq!(attrs.strikethrough, Some(true));
    assert_eq!(attrs.size, Some(10.5));
    assert_eq!(attrs.pdf_font_name.as_deref(), Some("Helvetica"));
    assert_eq!(attrs.pdf_encoding.as_deref(), Some("Cp1252"));
    assert_eq!(attrs.pdf_embedded, Some(true));
    assert_eq!(attrs.foreground, Some(Colour::from_rgb(0xff0000)));
    assert_eq!(attrs.background, Some(Colour::from_rgb(0x00ff00)));
}

#[test]
fn test_bad_colour_is_black() {
    let text = parse_plain("<style forecolor=\"no such colour\">x</style>");
    assert_eq!(text.attributes_at(0).foreground, Some(Colour::BLACK));
}

#[test]
fn test_style_rewrite() {
    test_rewrite(
        "<style isBold=\"true\" forecolor=\"red\">x</style>",
        "<style isBold=\"true\" forecolor=\"#FF0000\">x</style>",
    );
    test_roundtrip("<style fontName=\"Serif\" size=\"12.5\" isPdfEmbedded=\"false\">x</style>y");
}

#[test]
fn test_innermost_wins() {
    let text = parse_plain("<b>a<style isBold=\"false\">b</style>c</b>");
    assert_eq!(text.attributes_at(0).weight, Some(Weight::Bold));
    assert_eq!(text.attributes_at(1).weight, Some(Weight::Regular));
    assert_eq!(text.attributes_at(2).weight, Some(Weight::Bold));
    assert_eq_str!(
        write(&text),
        "<style isBold=\"true\">a</style><style isBold=\"false\">b</style><style isBold=\"true\">c</style>"
    );
}

#[test]
fn test_underline_off() {
    test_rewrite(
        "<u>a<style isUnderline=\"false\">b</style></u>",
        "<style isUnderline=\"true\">a</style>b",
    );
}

#[test]
fn test_script() {
    test_roundtrip("H<sub>2</sub>O and x<sup>2</sup>");
}

#[test]
fn test_global_attributes() {
    let global = AttributeSet::new().with_family("Serif").with_size(10.0);
    let text = parse(&global, "<style fontName=\"Serif\">x</style><font size=\"11\">y</font>", None).unwrap();
    assert_eq!(text.global_attributes(), &global);
    assert_eq!(text.attributes_at(0).size, Some(10.0));
    assert_eq_str!(write(&text), "x<style size=\"11\">y</style>");
}

#[test]
fn test_font_face_fallback() {
    let conf = config::new().font_families(Arc::new(FontFamilies::new(["Arial", "Courier"])));
    let text = conf
        .parse("<font face=\"Corporate Sans, Arial,Courier\" size=\"9\" color=\"#00ff00\">x</font>")
        .unwrap();
    let attrs = text.attributes_at(0);
    assert_eq!(attrs.family.as_deref(), Some("Arial"));
    assert_eq!(attrs.size, Some(9.0));
    assert_eq!(attrs.foreground, Some(Colour::from_rgb(0x00ff00)));

    let text = conf.parse("<font face=\"Nothing, Known\">x</font>").unwrap();
    assert_eq!(text.attributes_at(0).family, None);
}

#[test]
fn test_config_locale() {
    let text = config::new().locale("fr_FR").styled_text("x", true);
    assert_eq!(text.locale(), Some("fr_FR"));
    let text = config::new().locale("fr_FR").parse("<b>x</b>").unwrap();
    assert_eq!(text.locale(), Some("fr_FR"));
}

#[test]
fn test_br() {
    let text = parse_plain("a<br/>b");
    assert_eq!(text.text(), "a\nb");
    assert_eq!(text.runs(), &[Run::new(AttributeSet::new(), 2, 2)]);

    let text = parse_plain("<b>x<br/></b>y");
    assert_eq!(text.text(), "x\ny");
    assert_eq!(text.runs()[1], Run::new(AttributeSet::new().with_weight(Weight::Bold), 0, 2));
}

#[test]
fn test_br_with_content_widens_runs() {
    let text = parse_plain("a<br>b</br>c");
    assert_eq!(text.text(), "a\nb\nc");
    assert_eq!(text.runs(), &[Run::new(AttributeSet::new(), 2, 4)]);
}

#[test]
fn test_entities_and_escaping() {
    let text = parse_plain("a &amp; b &lt;c&gt; &#169;");
    assert_eq!(text.text(), "a & b <c> \u{a9}");
    assert_eq_str!(write(&text), "a &amp; b &lt;c&gt; \u{a9}");

    let text = StyledText::plain("x\r\ny", AttributeSet::new(), None);
    assert_eq_str!(write(&text), "x&#13;\ny");
    assert_eq!(parse_plain(&write(&text)).text(), "x\r\ny");
}

#[test]
fn test_comments_ignored() {
    let text = parse_plain("a<!-- note -->b<?pi x?>c");
    assert_eq!(text.text(), "abc");
    assert!(text.runs().is_empty());
}

#[test]
fn test_ordered_list() {
    let text = parse_plain("<ol><li>a</li><li>b</li></ol>");
    assert_eq!(text.text(), "ab");
    let runs = text.runs();
    assert_eq!(runs.len(), 3);

    let first = &runs[0];
    assert_eq!((first.start, first.end), (0, 1));
    let path = first.attributes.list.as_ref().unwrap();
    assert_eq!(path.len(), 1);
    assert!(path[0].ordered);
    assert_eq!(path[0].item_count, 1);
    assert_eq!(first.attributes.list_item.unwrap().index, 0);

    let second = &runs[1];
    assert_eq!((second.start, second.end), (1, 2));
    assert_eq!(second.attributes.list.as_ref().unwrap()[0].item_count, 2);
    assert_eq!(second.attributes.list_item.unwrap().index, 1);

    // The list's own run comes last and covers both items.
    assert_eq!((runs[2].start, runs[2].end), (0, 2));
    assert!(runs[2].attributes.list_item.is_none());

    let output = write(&text);
    assert_eq_str!(output, "<ol><li>a</li><li>b</li></ol>");
    assert_eq!(output.matches("<ol").count(), 1);
    assert_eq!(output.matches("<li>").count(), 2);
}

#[test]
fn test_ordered_list_attributes() {
    test_roundtrip("<ol type=\"a\" start=\"3\"><li>x</li><li>y</li></ol>");
    test_roundtrip("<ol><li>a</li><li></li><li>c</li></ol>");
    test_rewrite("<ol><li></li><li>b</li></ol>", "<ol start=\"2\"><li>b</li></ol>");
    assert!(matches!(
        test_parse_err("<ol start=\"three\"><li>x</li></ol>"),
        Error::InvalidAttribute { name, .. } if name == "start"
    ));
}

#[test]
fn test_nested_lists() {
    let markup = "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>";
    let text = parse_plain(markup);
    assert_eq!(text.text(), "abc");

    let b = text.attributes_at(1);
    let path = b.list.as_ref().unwrap();
    assert_eq!(path.len(), 2);
    assert!(path[1].began_inside_item);
    assert!(!path[1].at_item_start);
    assert!(path[1].at_item_end);
    assert_eq!(b.list_item.unwrap().list, path[1].id);

    let c = text.attributes_at(2);
    assert_eq!(c.list.as_ref().unwrap().len(), 1);
    assert_eq!(c.list_item.unwrap().index, 1);

    test_roundtrip(markup);
}

#[test]
fn test_nested_list_at_item_start() {
    let markup = "<ol><li><ul><li>x</li></ul>y</li></ol>";
    let text = parse_plain(markup);
    let path = text.attributes_at(0).list.unwrap();
    assert!(path[1].at_item_start);
    assert!(!path[1].at_item_end);
    test_roundtrip(markup);
}

#[test]
fn test_bare_list_item() {
    let text = parse_plain("<li noBullet=\"true\">x</li>y");
    let attrs = text.attributes_at(0);
    let path = attrs.list.as_ref().unwrap();
    assert_eq!(path.len(), 1);
    assert!(!path[0].ordered);
    assert!(attrs.list_item.unwrap().no_bullet);
    assert!(text.attributes_at(1).list.is_none());
    assert_eq_str!(write(&text), "<ul><li noBullet=\"true\">x</li></ul>y");
}

#[test]
fn test_text_outside_items() {
    test_roundtrip("<ul>x<li>y</li></ul>z");
}

#[test]
fn test_hyperlink() {
    let text = parse_plain(
        "<a href=\"x\"><param name=\"k\" valueClass=\"java.lang.String\">v</param>link</a>",
    );
    assert_eq!(text.text(), "link");
    assert_eq!(text.runs().len(), 1);
    let run = &text.runs()[0];
    assert_eq!((run.start, run.end), (0, 4));
    let link = run.attributes.hyperlink.as_ref().unwrap();
    assert_eq!(link.kind, HyperlinkKind::Reference);
    assert_eq!(link.reference.as_deref(), Some("x"));
    assert_eq!(link.parameters.len(), 1);
    let param = &link.parameters[0];
    assert_eq!(param.name.as_deref(), Some("k"));
    assert_eq!(param.value_class, "java.lang.String");
    assert_eq!(param.value, Some(ParamValue::String("v".into())));
}

#[test]
fn test_hyperlink_rewrite() {
    test_roundtrip(
        "see <a href=\"http://example.com/?a=1&amp;b=2\" type=\"Custom\" target=\"_blank\">\
         <param name=\"n\" valueClass=\"java.lang.Integer\">5</param>\
         <param name=\"s\" valueClass=\"java.lang.String\">a&lt;b</param>here</a>",
    );
}

#[test]
fn test_blank_hyperlink_attributes() {
    let text = parse_plain("<a href=\"\" type=\" \" target=\"\">x</a>");
    let link = text.attributes_at(0).hyperlink.unwrap();
    assert_eq!(link.reference, None);
    assert_eq!(link.link_type, None);
    assert_eq!(link.link_target, None);
    test_rewrite("<a href=\"\">x</a>", "<a>x</a>");
    let reparsed = parse_plain(&write(&text));
    assert_eq!(reparsed.attributes_at(0), text.attributes_at(0));
}

#[test]
fn test_hyperlink_errors() {
    assert!(matches!(
        test_parse_err("<a href=\"x\"><a href=\"y\">n</a></a>"),
        Error::NestedHyperlink
    ));
    assert!(matches!(
        test_parse_err("<param name=\"k\">v</param>"),
        Error::ParamOutsideHyperlink
    ));
    assert!(matches!(
        test_parse_err("<a><param valueClass=\"java.lang.Integer\">x</param></a>"),
        Error::InvalidParameterValue { .. }
    ));
}

#[test]
fn test_parse_errors() {
    assert!(matches!(test_parse_err("<blink>x</blink>"), Error::UnknownTag(name) if name == "blink"));
    assert!(matches!(test_parse_err("<b>x"), Error::MalformedMarkup(_)));
    assert!(matches!(test_parse_err("a & b"), Error::MalformedMarkup(_)));
    assert!(matches!(
        test_parse_err("<b xmlns=\"urn:x\">x</b>"),
        Error::UnknownTag(_)
    ));
    assert!(matches!(
        test_parse_err("<style size=\"big\">x</style>"),
        Error::InvalidAttribute { name, value } if name == "size" && value == "big"
    ));
    for size in ["NaN", "inf", "-infinity"] {
        assert!(matches!(
            test_parse_err(&format!("<style size=\"{}\">x</style>", size)),
            Error::InvalidAttribute { name, .. } if name == "size"
        ));
    }
}

#[test]
fn test_post_order() {
    for markup in [
        "<b>a<i>b<u>c</u></i><ol><li>d</li></ol></b>",
        // The empty run starts where the first item ends, so isn't inside it.
        "<b><ul><li>a</li><li><b></b></li></ul></b>",
    ] {
        let text = parse_plain(markup);
        let runs = text.runs();
        for (i, outer) in runs.iter().enumerate() {
            for (j, inner) in runs.iter().enumerate() {
                let strictly_contains = outer.start <= inner.start
                    && inner.end <= outer.end
                    && (inner.start < outer.end || inner.start == outer.start)
                    && (outer.start, outer.end) != (inner.start, inner.end);
                if strictly_contains {
                    assert!(j < i, "{markup}: run {j} inside run {i} but added after it");
                }
            }
        }
    }
}

#[test]
fn test_write_range() {
    let text = parse_plain("<ol type=\"a\" start=\"3\"><li>x</li><li>y</li></ol>");
    assert_eq_str!(
        write_range(&text, 1, 2).unwrap(),
        "<ol type=\"a\" start=\"4\"><li>y</li></ol>"
    );

    let text = parse_plain("<b>bold</b> text");
    assert_eq_str!(write_range(&text, 2, 7).unwrap(), "<style isBold=\"true\">ld</style> te");
    assert_eq_str!(write_range(&text, 3, 3).unwrap(), "");
    assert!(matches!(
        write_range(&text, 5, 20),
        Err(Error::InvalidRange { start: 5, end: 20, len: 9 })
    ));
}
