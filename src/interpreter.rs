//! Interpreter that drives a [`Turtle`] from an L-string.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with [`TurtleDefaults`]
//! (and optionally [`DrawOptions`]), remap symbols with
//! [`TurtleInterpreter::set_op`] if needed, then call
//! [`TurtleInterpreter::interpret`] with any [`Canvas`].

use crate::args::Argument;
use crate::canvas::Canvas;
use crate::cuts::apply_cuts;
use crate::error::{ConfigError, InterpretError};
use crate::tokenizer::{CommandToken, tokenize};
use crate::turtle::{DrawOptions, MIN_LINE_WIDTH, Turtle, TurtleState};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Values used by commands given without arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleDefaults {
    /// Step for `F` and `f`. Must be > 0.
    pub step_size: f32,
    /// Initial line width. Must be > 0.
    pub line_width: f32,
    /// Angle in degrees for rotation commands, within `[0, 360]`.
    pub rotation_angle: f32,
    /// Factor applied by `_`; `!` applies `2 - factor`. Must be >= 1.
    pub width_growth_factor: f32,
    /// Initial attribute (material) index.
    pub attribute_index: u32,
}

impl Default for TurtleDefaults {
    fn default() -> Self {
        Self {
            step_size: 2.0,
            line_width: 0.5,
            rotation_angle: 45.0,
            width_growth_factor: 1.05,
            attribute_index: 0,
        }
    }
}

impl TurtleDefaults {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f32, &'static str, bool); 4] = [
            ("step_size", self.step_size, "finite and > 0", self.step_size > 0.0),
            ("line_width", self.line_width, "finite and > 0", self.line_width > 0.0),
            (
                "rotation_angle",
                self.rotation_angle,
                "within [0, 360]",
                (0.0..=360.0).contains(&self.rotation_angle),
            ),
            (
                "width_growth_factor",
                self.width_growth_factor,
                "finite and >= 1",
                self.width_growth_factor >= 1.0,
            ),
        ];
        for (field, value, requirement, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ConfigError::OutOfRange {
                    field,
                    requirement,
                    value: value as f64,
                });
            }
        }
        Ok(())
    }
}

/// Operations a command symbol can map to.
///
/// Signed variants carry the factor applied to the angle: `Turn(-1.0)` is the
/// standard `+`, `Turn(1.0)` the standard `-`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Draw an internode, then move (`F`).
    DrawForward,
    /// Move without drawing (`f`).
    Move,
    /// Save the turtle state (`[`).
    Push,
    /// Restore the last saved state (`]`).
    Pop,
    /// Rotate about the local up axis (`+`/`-`).
    Turn(f32),
    /// Rotate about the local left axis (`&`/`^`).
    Pitch(f32),
    /// Rotate about the heading (`\` / `/`).
    Roll(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Multiply the width by the growth factor, or set it (`_`).
    GrowWidth,
    /// Multiply the width by the inverse growth factor, or set it; then clamp (`!`).
    ShrinkWidth,
    /// Increment the attribute index, or set it clamped (`;`).
    NextAttribute,
    /// Decrement the attribute index clamped, or set it unclamped (`,`).
    PreviousAttribute,
    /// Draw a named host module (`~`).
    CustomModule,
    /// No-op; the symbol has no drawing meaning.
    Ignore,
}

impl TurtleOp {
    /// Short description and accepted argument lists, used in arity errors.
    fn signature(self) -> (&'static str, &'static [&'static str]) {
        match self {
            TurtleOp::DrawForward => (
                "move turtle and draw",
                &["", "(step_size)", "(step_size, width)"],
            ),
            TurtleOp::Move => ("move turtle", &["", "(step_size)"]),
            TurtleOp::Push => ("push current turtle state to stack", &[""]),
            TurtleOp::Pop => ("restore turtle state from stack", &[""]),
            TurtleOp::Turn(s) if s < 0.0 => ("turn left", &["", "(angle_degree)"]),
            TurtleOp::Turn(_) => ("turn right", &["", "(angle_degree)"]),
            TurtleOp::Pitch(s) if s < 0.0 => ("pitch down", &["", "(angle_degree)"]),
            TurtleOp::Pitch(_) => ("pitch up", &["", "(angle_degree)"]),
            TurtleOp::Roll(s) if s < 0.0 => ("roll right", &["", "(angle_degree)"]),
            TurtleOp::Roll(_) => ("roll left", &["", "(angle_degree)"]),
            TurtleOp::TurnAround => ("turn halfway around", &[""]),
            TurtleOp::GrowWidth => ("increase or set linewidth", &["", "(width)"]),
            TurtleOp::ShrinkWidth => ("decrease or set linewidth", &["", "(width)"]),
            TurtleOp::NextAttribute => ("increase or set attribute index", &["", "(index)"]),
            TurtleOp::PreviousAttribute => ("decrease or set attribute index", &["", "(index)"]),
            TurtleOp::CustomModule => (
                "draw custom module",
                &[
                    "(\"Module\")",
                    "(\"Module\", scale)",
                    "(\"Module\", scale_x, scale_y, scale_z)",
                ],
            ),
            TurtleOp::Ignore => ("ignored", &[]),
        }
    }

    fn arity_error(self, symbol: char, found: usize) -> InterpretError {
        let (description, forms) = self.signature();
        let usage = forms
            .iter()
            .map(|form| format!("'{symbol}{form}'"))
            .collect::<Vec<_>>()
            .join(" or ");
        InterpretError::Arity {
            symbol,
            found,
            description,
            usage,
        }
    }
}

/// The outcome of a complete interpretation run.
#[derive(Clone, Debug)]
pub struct Interpretation<H> {
    /// Root every drawn module hangs under.
    pub root: H,
    /// World transform handed to [`Canvas::orient_root`].
    pub root_transform: Mat4,
    /// Turtle state after the last command.
    pub turtle: TurtleState<H>,
    /// Branches left open by unmatched `[`.
    pub stack_depth: usize,
}

/// Rotation that stands the structure upright: the turtle heading (+X) becomes +Z.
pub fn upright_correction() -> Mat4 {
    Mat4::from_rotation_y((-90.0f32).to_radians())
}

/// Interprets L-strings with a symbol table and a set of defaults.
pub struct TurtleInterpreter {
    op_map: HashMap<char, TurtleOp>,
    defaults: TurtleDefaults,
    draw_options: DrawOptions,
}

impl Default for TurtleInterpreter {
    fn default() -> Self {
        Self::new(TurtleDefaults::default())
    }
}

impl TurtleInterpreter {
    /// Creates an interpreter with the standard symbol table.
    pub fn new(defaults: TurtleDefaults) -> Self {
        let mut interpreter = Self {
            op_map: HashMap::new(),
            defaults,
            draw_options: DrawOptions::default(),
        };
        interpreter.populate_standard_symbols();
        interpreter
    }

    /// Sets the drawing options for turtles created by [`interpret`](Self::interpret)
    /// (builder pattern).
    pub fn with_draw_options(mut self, options: DrawOptions) -> Self {
        self.draw_options = options;
        self
    }

    pub fn defaults(&self) -> &TurtleDefaults {
        &self.defaults
    }

    pub fn draw_options(&self) -> &DrawOptions {
        &self.draw_options
    }

    /// Assigns `op` to `symbol`, replacing any previous mapping.
    pub fn set_op(&mut self, symbol: char, op: TurtleOp) {
        self.op_map.insert(symbol, op);
    }

    /// The operation `symbol` maps to; unmapped symbols are [`TurtleOp::Ignore`].
    pub fn op(&self, symbol: char) -> TurtleOp {
        self.op_map.get(&symbol).copied().unwrap_or(TurtleOp::Ignore)
    }

    /// Registers the conventional command symbols.
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            // Movement
            ('F', TurtleOp::DrawForward),
            ('f', TurtleOp::Move),
            // Branching
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
            // Rotation
            ('+', TurtleOp::Turn(-1.0)),
            ('-', TurtleOp::Turn(1.0)),
            ('&', TurtleOp::Pitch(-1.0)),
            ('^', TurtleOp::Pitch(1.0)),
            ('\\', TurtleOp::Roll(-1.0)),
            ('/', TurtleOp::Roll(1.0)),
            ('|', TurtleOp::TurnAround),
            // Attributes
            ('_', TurtleOp::GrowWidth),
            ('!', TurtleOp::ShrinkWidth),
            (';', TurtleOp::NextAttribute),
            (',', TurtleOp::PreviousAttribute),
            // Modules
            ('~', TurtleOp::CustomModule),
        ];

        for (symbol, op) in mappings {
            self.set_op(symbol, op);
        }
    }

    fn validate(&self) -> Result<(), InterpretError> {
        self.defaults.validate()?;
        self.draw_options.validate()?;
        Ok(())
    }

    /// Interprets `lstring` onto `canvas` with a fresh turtle.
    ///
    /// Cuts (`%`) are resolved first, then every command is applied in order.
    /// Unknown symbols are skipped. After the last command the root receives
    /// [`upright_correction`]. Any error aborts the run; whatever the canvas
    /// received up to that point should be discarded by the caller.
    #[tracing::instrument(level = "debug", skip_all, fields(len = lstring.len()))]
    pub fn interpret<C: Canvas>(
        &self,
        lstring: &str,
        canvas: &mut C,
    ) -> Result<Interpretation<C::Handle>, InterpretError> {
        self.validate()?;
        let mut turtle = Turtle::new(
            canvas,
            self.defaults.line_width,
            i32::try_from(self.defaults.attribute_index).unwrap_or(i32::MAX),
            self.draw_options.clone(),
        );
        self.run(lstring, &mut turtle, canvas)?;

        let root_transform = upright_correction();
        canvas.orient_root(turtle.root(), root_transform);

        Ok(Interpretation {
            root: turtle.root().clone(),
            root_transform,
            stack_depth: turtle.stack_depth(),
            turtle: turtle.into_state(),
        })
    }

    /// Applies the commands of `lstring` to an existing turtle.
    ///
    /// Unlike [`interpret`](Self::interpret) this neither creates a root nor
    /// applies the upright correction, so several strings can be chained.
    /// The turtle draws with the [`DrawOptions`] it was created with, not the
    /// interpreter's; both the defaults and the turtle's options are validated.
    #[tracing::instrument(level = "debug", skip_all, fields(len = lstring.len()))]
    pub fn run<C: Canvas>(
        &self,
        lstring: &str,
        turtle: &mut Turtle<C::Handle>,
        canvas: &mut C,
    ) -> Result<(), InterpretError> {
        self.defaults.validate()?;
        turtle.options().validate()?;
        let cleaned = apply_cuts(lstring);
        let tokens = tokenize(&cleaned);
        debug!(
            removed = lstring.len() - cleaned.len(),
            tokens = tokens.len(),
            "tokenized l-string"
        );

        for token in &tokens {
            self.apply(token, turtle, canvas)?;
        }

        debug!(open_branches = turtle.stack_depth(), "interpretation finished");
        Ok(())
    }

    fn apply<C: Canvas>(
        &self,
        token: &CommandToken,
        turtle: &mut Turtle<C::Handle>,
        canvas: &mut C,
    ) -> Result<(), InterpretError> {
        let op = self.op(token.symbol);
        if op == TurtleOp::Ignore {
            trace!(symbol = %token.symbol, "ignoring unsupported command");
            return Ok(());
        }
        trace!(symbol = %token.symbol, ?op, args = token.arity(), "dispatching");

        let symbol = token.symbol;
        let args = token.args();
        let num = |idx: usize| number(symbol, &args, idx);
        let d = &self.defaults;

        match (op, args.len()) {
            (TurtleOp::DrawForward, 0) => {
                turtle.draw_internode(canvas, d.step_size, None);
                turtle.move_forward(d.step_size);
            }
            (TurtleOp::DrawForward, 1) => {
                let length = num(0)?;
                turtle.draw_internode(canvas, length, None);
                turtle.move_forward(length);
            }
            (TurtleOp::DrawForward, 2) => {
                let length = num(0)?;
                let width = num(1)?;
                turtle.draw_internode(canvas, length, Some(width));
                turtle.move_forward(length);
            }

            (TurtleOp::Move, 0) => turtle.move_forward(d.step_size),
            (TurtleOp::Move, 1) => turtle.move_forward(num(0)?),

            (TurtleOp::Push, 0) => {
                turtle.push(canvas);
                trace!(depth = turtle.stack_depth(), "pushed turtle state");
            }
            (TurtleOp::Pop, 0) => {
                turtle.pop()?;
                trace!(depth = turtle.stack_depth(), "popped turtle state");
            }

            (TurtleOp::Turn(s), 0) => turtle.turn(s * d.rotation_angle),
            (TurtleOp::Turn(s), 1) => turtle.turn(s * num(0)?),
            (TurtleOp::Pitch(s), 0) => turtle.pitch(s * d.rotation_angle),
            (TurtleOp::Pitch(s), 1) => turtle.pitch(s * num(0)?),
            (TurtleOp::Roll(s), 0) => turtle.roll(s * d.rotation_angle),
            (TurtleOp::Roll(s), 1) => turtle.roll(s * num(0)?),
            (TurtleOp::TurnAround, 0) => turtle.turn(180.0),

            (TurtleOp::GrowWidth, 0) => turtle.state_mut().line_width *= d.width_growth_factor,
            (TurtleOp::GrowWidth, 1) => turtle.state_mut().line_width = num(0)?,
            (TurtleOp::ShrinkWidth, n @ (0 | 1)) => {
                let state = turtle.state_mut();
                if n == 0 {
                    state.line_width *= 2.0 - d.width_growth_factor;
                } else {
                    state.line_width = num(0)?;
                }
                state.line_width = state.line_width.max(MIN_LINE_WIDTH);
            }

            (TurtleOp::NextAttribute, 0) => {
                let state = turtle.state_mut();
                state.attribute_index = state.attribute_index.saturating_add(1);
            }
            (TurtleOp::NextAttribute, 1) => {
                turtle.state_mut().attribute_index = (num(0)? as i32).max(0);
            }
            (TurtleOp::PreviousAttribute, 0) => {
                let state = turtle.state_mut();
                state.attribute_index = state.attribute_index.saturating_sub(1).max(0);
            }
            (TurtleOp::PreviousAttribute, 1) => {
                turtle.state_mut().attribute_index = num(0)? as i32;
            }

            (TurtleOp::CustomModule, n @ (1 | 2 | 4)) => {
                let name = text(symbol, &args, 0)?;
                let scale = match n {
                    1 => Vec3::ONE,
                    2 => Vec3::splat(num(1)?),
                    _ => Vec3::new(num(1)?, num(2)?, num(3)?),
                };
                turtle.draw_custom_module(canvas, name, scale)?;
            }

            (op, found) => return Err(op.arity_error(symbol, found)),
        }
        Ok(())
    }
}

fn number(symbol: char, args: &[Argument], index: usize) -> Result<f32, InterpretError> {
    match &args[index] {
        Argument::Number(n) => Ok(*n as f32),
        Argument::Text(found) => Err(InterpretError::ArgumentType {
            symbol,
            index,
            expected: "a number",
            found: found.clone(),
        }),
    }
}

fn text(symbol: char, args: &[Argument], index: usize) -> Result<&str, InterpretError> {
    match &args[index] {
        Argument::Text(name) => Ok(name),
        Argument::Number(n) => Err(InterpretError::ArgumentType {
            symbol,
            index,
            expected: "a module name",
            found: n.to_string(),
        }),
    }
}
