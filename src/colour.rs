//! Parsing and formatting of the colour values used by `forecolor`,
//! `backcolor` and `<font color>`.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, digit1, hex_digit1},
    combinator::{all_consuming, map_res},
    error::ErrorKind,
    IResult, Parser,
};

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Colour {
    /// Black, also the colour used when a colour value can't be parsed.
    pub const BLACK: Colour = Colour { r: 0, g: 0, b: 0 };

    /// Build a colour from a packed `0xRRGGBB` value; any higher bits are
    /// ignored.
    pub fn from_rgb(rgb: u32) -> Colour {
        Colour {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Parse a colour attribute value, falling back to black.
    pub fn parse_or_black(text: &str) -> Colour {
        parse_colour(text).unwrap_or(Colour::BLACK)
    }
}

/// Formats as `#RRGGBB`.
impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn hex_colour(text: &str) -> IResult<&str, Colour> {
    let (rest, _) = alt((tag("#"), tag_no_case("0x"))).parse(text)?;
    let (rest, rgb) = map_res(hex_digit1, |digits: &str| u32::from_str_radix(digits, 16)).parse(rest)?;
    Ok((rest, Colour::from_rgb(rgb)))
}

fn decimal_colour(text: &str) -> IResult<&str, Colour> {
    let (rest, rgb) = map_res(digit1, |digits: &str| digits.parse::<u32>()).parse(text)?;
    Ok((rest, Colour::from_rgb(rgb)))
}

fn named_colour(text: &str) -> IResult<&str, Colour> {
    let (rest, name) = alpha1(text)?;
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => 0x000000,
        "blue" => 0x0000ff,
        "cyan" => 0x00ffff,
        "darkgray" => 0x404040,
        "gray" => 0x808080,
        "green" => 0x00ff00,
        "lightgray" => 0xc0c0c0,
        "magenta" => 0xff00ff,
        "orange" => 0xffc800,
        "pink" => 0xffafaf,
        "red" => 0xff0000,
        "white" => 0xffffff,
        "yellow" => 0xffff00,
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(text, ErrorKind::Tag)));
        }
    };
    Ok((rest, Colour::from_rgb(rgb)))
}

/// Parse `#RRGGBB`, `0xRRGGBB`, a decimal integer or a colour name.
pub fn parse_colour(text: &str) -> Option<Colour> {
    all_consuming(alt((hex_colour, decimal_colour, named_colour)))
        .parse(text.trim())
        .ok()
        .map(|(_, colour)| colour)
}
