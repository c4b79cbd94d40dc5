//! Markup Attribute Parsing
//!
//! Parses attributes from tag content. Values are kept as raw source
//! text: nothing in the rewrite pipeline needs entity-decoded values, and
//! comparisons against `id`/`type` markers are done on the raw form.

use super::scanner::{is_name_char, is_whitespace};

/// A parsed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, ASCII-lowercased
    pub name: String,
    /// Raw attribute value (empty for boolean attributes)
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input is the content between the element name and `>` or `/>`.
/// Malformed bytes are skipped rather than reported.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if input[pos] == b'/' || input[pos] == b'>' {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < input.len() && is_attribute_name_char(input[pos]) {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let name = lossy_lower(&input[name_start..pos]);

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            attrs.push(Attribute::new(name, ""));
            continue;
        }
        pos += 1; // '='

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            attrs.push(Attribute::new(name, ""));
            break;
        }

        let quote = input[pos];
        let value = if quote == b'"' || quote == b'\'' {
            pos += 1;
            let value_start = pos;
            while pos < input.len() && input[pos] != quote {
                pos += 1;
            }
            let value = &input[value_start..pos];
            pos += 1; // closing quote
            value
        } else {
            let value_start = pos;
            while pos < input.len() && !is_whitespace(input[pos]) && input[pos] != b'>' {
                pos += 1;
            }
            &input[value_start..pos]
        };

        attrs.push(Attribute::new(name, String::from_utf8_lossy(value)));
    }

    attrs
}

#[inline]
fn is_attribute_name_char(b: u8) -> bool {
    is_name_char(b) || b == b'@'
}

fn lossy_lower(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_lowercase()
}
