//! Identifier sanitizing and escaping
//!
//! Pure helpers that turn arbitrary icon names into safe CSS identifiers,
//! CSS string literals, file names, and script identifiers. HTML escaping
//! is left to the template engine's auto-escaping.

use std::fmt::Write;

use heck::ToLowerCamelCase;

/// Serialize `value` as a CSS identifier (no leading `.`).
///
/// Leading digits, whitespace, and any other character that cannot start or
/// appear in an identifier are backslash-escaped.
pub fn css_identifier(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    // Writing into a String cannot fail.
    let _ = cssparser::serialize_identifier(value, &mut out);
    out
}

/// Serialize `value` as a double-quoted CSS string literal.
///
/// Control characters and everything outside printable ASCII become hex
/// escapes, so `"\u{F000}"` renders as `"\F000"`. `cssparser::serialize_string`
/// passes such characters through literally, which is why it is not used here.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            _ => {
                let _ = write!(out, "\\{:X}", c as u32);
                // A following hex digit or space would be read as part of the escape.
                if chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_hexdigit() || *next == ' ')
                {
                    out.push(' ');
                }
            }
        }
    }

    out.push('"');
    out
}

/// Turn a font name into something usable as a file name.
pub fn file_stem(value: &str) -> String {
    sanitize_filename::sanitize(value)
}

/// Lower camel case form of an icon name (`weather-rain` → `weatherRain`).
pub fn camel_case(value: &str) -> String {
    value.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("icon-home", "icon-home")]
    #[case("2x", "\\32 x")]
    #[case("with space", "with\\ space")]
    #[case("a.b", "a\\.b")]
    fn test_css_identifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(css_identifier(input), expected);
    }

    #[rstest]
    #[case("\u{F000}", "\"\\F000\"")]
    #[case("plain", "\"plain\"")]
    #[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
    #[case("back\\slash", "\"back\\\\slash\"")]
    #[case("\u{F000}a", "\"\\F000 a\"")]
    #[case("\u{F000}z", "\"\\F000z\"")]
    #[case("a\nb", "\"a\\A b\"")]
    fn test_css_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(css_string(input), expected);
    }

    #[test]
    fn test_file_stem_strips_separators() {
        let stem = file_stem("My/Icons:v2");
        assert!(!stem.contains('/'));
        assert!(!stem.contains(':'));
        assert!(stem.starts_with("My"));
    }

    #[rstest]
    #[case("weather-rain", "weatherRain")]
    #[case("icon-2", "icon2")]
    #[case("arrow_left", "arrowLeft")]
    #[case("Home", "home")]
    fn test_camel_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_case(input), expected);
    }
}
