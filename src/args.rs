//! Argument parsing for a single command token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed command argument.
///
/// The type is decided by content: any piece of text that parses as a number is
/// numeric, everything else is kept as text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Number(f64),
    Text(String),
}

impl Argument {
    /// Types one raw argument. Surrounding whitespace is ignored and one level of
    /// matching quotes is stripped from text values.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match parse_number(trimmed) {
            Some(n) => Argument::Number(n),
            None => Argument::Text(unquote(trimmed).to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Argument::Number(n) => Some(*n),
            Argument::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Text(s) => Some(s),
            Argument::Number(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Number(n) => write!(f, "{n}"),
            Argument::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Parses a number, also accepting `_` separators placed between two digits (`1_000`).
fn parse_number(s: &str) -> Option<f64> {
    if !s.contains('_') {
        return s.parse().ok();
    }
    let bytes = s.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    s.replace('_', "").parse().ok()
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Returns the raw, untrimmed pieces of a command's argument list.
///
/// The list is the text between the first `(` and the last `)`. A command without
/// parentheses, or with an empty pair, has no arguments.
pub fn split_args(command: &str) -> Vec<&str> {
    let (Some(open), Some(close)) = (command.find('('), command.rfind(')')) else {
        return Vec::new();
    };
    if close <= open + 1 {
        return Vec::new();
    }
    command[open + 1..close].split(',').collect()
}

/// Extracts the typed arguments of a command, e.g. `F(1,2)` yields `[1.0, 2.0]`.
pub fn extract_args(command: &str) -> Vec<Argument> {
    split_args(command).into_iter().map(Argument::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_arguments() {
        assert_eq!(
            extract_args("F(1,2)"),
            vec![Argument::Number(1.0), Argument::Number(2.0)]
        );
        assert_eq!(extract_args("+(-22.5)"), vec![Argument::Number(-22.5)]);
        assert_eq!(extract_args("f( 1e2 )"), vec![Argument::Number(100.0)]);
    }

    #[test]
    fn digit_separators() {
        assert_eq!(extract_args("f(1_000)"), vec![Argument::Number(1000.0)]);
        assert_eq!(extract_args("f(2_5.0_5)"), vec![Argument::Number(25.05)]);
        assert_eq!(extract_args("f(_1)"), vec![Argument::Text("_1".into())]);
        assert_eq!(extract_args("f(1__0)"), vec![Argument::Text("1__0".into())]);
        assert_eq!(extract_args("f(1_)"), vec![Argument::Text("1_".into())]);
    }

    #[test]
    fn mixed_arguments() {
        assert_eq!(
            extract_args("~(\"Leaf\",2)"),
            vec![Argument::Text("Leaf".into()), Argument::Number(2.0)]
        );
        assert_eq!(extract_args("~('Bud')"), vec![Argument::Text("Bud".into())]);
        assert_eq!(extract_args("~(Bud)"), vec![Argument::Text("Bud".into())]);
    }

    #[test]
    fn no_arguments() {
        assert!(extract_args("F").is_empty());
        assert!(extract_args("F()").is_empty());
        assert!(extract_args("[").is_empty());
    }

    #[test]
    fn empty_pieces_are_text() {
        assert_eq!(
            extract_args("F(,)"),
            vec![Argument::Text(String::new()), Argument::Text(String::new())]
        );
    }

    #[test]
    fn lone_quote_is_not_stripped() {
        assert_eq!(extract_args("~(\")"), vec![Argument::Text("\"".into())]);
    }
}
