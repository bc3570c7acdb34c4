//! Error types raised while interpreting an L-string.

use thiserror::Error;

/// A malformed command or an unusable configuration.
///
/// Every variant aborts the interpretation run at the offending command; the
/// caller is expected to discard whatever the canvas received so far.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// A command received a number of arguments it has no overload for.
    #[error(
        "invalid number of arguments for command '{symbol}' ({description}): got {found}\nUsage: {usage}"
    )]
    Arity {
        symbol: char,
        found: usize,
        description: &'static str,
        usage: String,
    },

    /// `]` was encountered while the state stack was empty.
    #[error("unbalanced ']': no saved turtle state to restore")]
    StackUnderflow,

    /// `~` referenced a custom module the canvas does not know.
    #[error("error using '~' draw custom module command: no module named '{0}'. Example usage: ~(\"Leaf\")")]
    UnknownModuleReference(String),

    /// An argument had the wrong kind (text where a number is required, or the reverse).
    #[error("argument {index} of command '{symbol}' must be {expected}, got '{found}'")]
    ArgumentType {
        symbol: char,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A default or drawing option outside its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}
