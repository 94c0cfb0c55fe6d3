//! Hyperlinks attached to text by `<a>`, with their typed `<param>`s.

use crate::{Error, Result};

/// The value class assumed for a `<param>` without `valueClass`.
pub const DEFAULT_VALUE_CLASS: &str = "java.lang.String";

/// The kind of target a hyperlink points at.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HyperlinkKind {
    /// An external reference (URL).  Links created from markup are always
    /// references.
    #[default]
    Reference,
}

/// A hyperlink descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hyperlink {
    /// Kind of link
    pub kind: HyperlinkKind,
    /// `href`
    pub reference: Option<String>,
    /// `type`: the custom link type name
    pub link_type: Option<String>,
    /// `target`: the window/frame the link opens in
    pub link_target: Option<String>,
    /// Parameters, in document order
    pub parameters: Vec<HyperlinkParameter>,
}

impl Hyperlink {
    /// Create a reference link to `href`.
    pub fn reference(href: impl Into<String>) -> Hyperlink {
        Hyperlink {
            reference: Some(href.into()),
            ..Default::default()
        }
    }

    /// Append a parameter.
    pub fn add_parameter(&mut self, parameter: HyperlinkParameter) {
        self.parameters.push(parameter);
    }
}

/// One `<param>` of a hyperlink.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperlinkParameter {
    /// `name`
    pub name: Option<String>,
    /// `valueClass`, the declared type of the value
    pub value_class: String,
    /// The decoded value; `None` for an empty non-string parameter
    pub value: Option<ParamValue>,
}

impl HyperlinkParameter {
    /// Decode a parameter from its declared class and serialized body.
    pub fn decode(name: Option<String>, value_class: Option<String>, body: &str) -> Result<HyperlinkParameter> {
        let value_class = value_class.unwrap_or_else(|| DEFAULT_VALUE_CLASS.to_string());
        let value = if body.is_empty() && value_class != DEFAULT_VALUE_CLASS {
            None
        } else {
            Some(ParamValue::deserialize(&value_class, body)?)
        };
        Ok(HyperlinkParameter {
            name,
            value_class,
            value,
        })
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// `java.lang.String`
    String(String),
    /// `java.lang.Character`
    Char(char),
    /// `java.lang.Boolean`
    Bool(bool),
    /// `java.lang.Byte`
    Byte(i8),
    /// `java.lang.Short`
    Short(i16),
    /// `java.lang.Integer`
    Integer(i32),
    /// `java.lang.Long`
    Long(i64),
    /// `java.lang.Float`
    Float(f32),
    /// `java.lang.Double`
    Double(f64),
    /// `java.math.BigInteger` / `java.math.BigDecimal`, kept as validated text
    Decimal(String),
    /// `java.util.Date`, in milliseconds since the epoch
    Date(i64),
    /// Any other class; the serialized text is kept as is.
    Raw(String),
}

fn invalid(class: &str, text: &str) -> Error {
    Error::InvalidParameterValue {
        class: class.to_string(),
        value: text.to_string(),
    }
}

fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal_text(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(&['e', 'E'][..]) {
        Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
        None => (text, None),
    };
    let unsigned = mantissa.strip_prefix(&['-', '+'][..]).unwrap_or(mantissa);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let mantissa_ok = !(int_part.is_empty() && frac_part.is_empty())
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit());
    mantissa_ok && exponent.map_or(true, is_integer_text)
}

impl ParamValue {
    /// Decode `text` as a value of `class`.
    pub fn deserialize(class: &str, text: &str) -> Result<ParamValue> {
        let value = match class {
            "java.lang.String" => ParamValue::String(text.to_string()),
            "java.lang.Character" => {
                ParamValue::Char(text.chars().next().ok_or_else(|| invalid(class, text))?)
            }
            "java.lang.Boolean" => ParamValue::Bool(text.eq_ignore_ascii_case("true")),
            "java.lang.Byte" => ParamValue::Byte(text.parse().map_err(|_| invalid(class, text))?),
            "java.lang.Short" => ParamValue::Short(text.parse().map_err(|_| invalid(class, text))?),
            "java.lang.Integer" => {
                ParamValue::Integer(text.parse().map_err(|_| invalid(class, text))?)
            }
            "java.lang.Long" => ParamValue::Long(text.parse().map_err(|_| invalid(class, text))?),
            "java.lang.Float" => {
                ParamValue::Float(text.trim().parse().map_err(|_| invalid(class, text))?)
            }
            "java.lang.Double" => {
                ParamValue::Double(text.trim().parse().map_err(|_| invalid(class, text))?)
            }
            "java.math.BigInteger" if is_integer_text(text) => ParamValue::Decimal(text.to_string()),
            "java.math.BigDecimal" if is_decimal_text(text) => ParamValue::Decimal(text.to_string()),
            "java.math.BigInteger" | "java.math.BigDecimal" => return Err(invalid(class, text)),
            "java.util.Date" => ParamValue::Date(text.parse().map_err(|_| invalid(class, text))?),
            _ => ParamValue::Raw(text.to_string()),
        };
        Ok(value)
    }

    /// Encode the value as the text of a `<param>` element.
    pub fn serialize(&self) -> String {
        match self {
            ParamValue::String(s) | ParamValue::Decimal(s) | ParamValue::Raw(s) => s.clone(),
            ParamValue::Char(c) => c.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Byte(v) => v.to_string(),
            ParamValue::Short(v) => v.to_string(),
            ParamValue::Integer(v) => v.to_string(),
            ParamValue::Long(v) | ParamValue::Date(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Double(v) => v.to_string(),
        }
    }
}
