//! # lstring-turtle
//!
//! A 3D turtle interpreter for L-system strings. It turns a derived L-string
//! such as `F(1)[+(45)F(1)][-(45)F(1)]` into calls on a host-provided
//! [`Canvas`], keeping the command language (cuts, tokenizing, arity-based
//! dispatch, branch stack) independent of any particular 3D engine.
//!
//! [`SceneBlueprint`] is a ready-made canvas that records the result as plain,
//! serializable data.

pub mod args;
pub mod canvas;
pub mod cuts;
pub mod error;
pub mod interpreter;
pub mod scene;
pub mod tokenizer;
pub mod turtle;

pub use args::*;
pub use canvas::*;
pub use cuts::*;
pub use error::*;
pub use interpreter::*;
pub use scene::*;
pub use tokenizer::*;
pub use turtle::*;

/// Interprets `lstring` with the standard symbol table and default drawing options.
pub fn interpret<C: Canvas>(
    lstring: &str,
    defaults: TurtleDefaults,
    canvas: &mut C,
) -> Result<Interpretation<C::Handle>, InterpretError> {
    TurtleInterpreter::new(defaults).interpret(lstring, canvas)
}
