//! Splits a cleaned L-string into command tokens.

use crate::args::{Argument, split_args};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One command: a symbol plus the raw text of its arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandToken {
    pub symbol: char,
    pub raw_args: Vec<String>,
}

impl CommandToken {
    /// Builds a token from its source text, e.g. `F(1,2)`. Returns `None` for empty text.
    pub fn from_text(text: &str) -> Option<Self> {
        let symbol = text.chars().next()?;
        let raw_args = split_args(text).into_iter().map(str::to_string).collect();
        Some(Self { symbol, raw_args })
    }

    pub fn arity(&self) -> usize {
        self.raw_args.len()
    }

    /// The typed arguments of this command.
    pub fn args(&self) -> Vec<Argument> {
        self.raw_args.iter().map(|a| Argument::parse(a)).collect()
    }
}

fn command_pattern() -> &'static Regex {
    static COMMAND: OnceLock<Regex> = OnceLock::new();
    COMMAND.get_or_init(|| {
        // A single non-parenthesis character, optionally followed by a flat
        // parenthesized argument list.
        Regex::new(r"[^()](?:\([^()]*\))?").expect("could not compile regex for commands")
    })
}

/// Tokenizes `cleaned` after stripping all whitespace.
///
/// Parentheses that do not belong to a flat argument list are skipped.
pub fn tokenize(cleaned: &str) -> Vec<CommandToken> {
    let compact: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();
    command_pattern()
        .find_iter(&compact)
        .filter_map(|m| CommandToken::from_text(m.as_str()))
        .collect()
}
