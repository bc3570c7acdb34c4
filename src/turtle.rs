//! Turtle state and drawing primitives.

use crate::canvas::Canvas;
use crate::error::{ConfigError, InterpretError};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Lower bound applied to the line width after a `!` command.
pub const MIN_LINE_WIDTH: f32 = 0.0001;

/// Position and orientation of the turtle.
///
/// In turtle-local space the heading is +X, left is +Y and up is +Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Returns the turtle's heading (local X) in world space.
    pub fn heading(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the turtle's left direction (local Y) in world space.
    pub fn left(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's up direction (local Z) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    fn rotate_local(&mut self, axis: Vec3, angle_degrees: f32) {
        self.rotation *= Quat::from_axis_angle(axis, angle_degrees.to_radians());
    }
}

/// Everything saved by `[` and restored by `]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState<H> {
    pub transform: Transform,

    /// Thickness of internodes drawn without an explicit width.
    pub line_width: f32,

    /// Material/attribute slot for drawn modules. May be negative after `,(n)`;
    /// it is clamped to zero whenever it is handed to the canvas.
    pub attribute_index: i32,

    /// Parent for modules drawn on the current branch.
    pub current_parent: Option<H>,
}

impl<H> TurtleState<H> {
    /// The attribute index as seen by the canvas.
    pub fn effective_attribute_index(&self) -> u32 {
        self.attribute_index.max(0) as u32
    }
}

/// How drawn modules are organised on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Build a parent/child hierarchy (one parent per branch) instead of joining
    /// everything into the root.
    pub hierarchy: bool,
    /// Place a node marker at every branch point (`[`).
    pub draw_nodes: bool,
    /// Factor applied to the step to obtain the drawn internode length.
    pub internode_length_scale: f32,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            hierarchy: false,
            draw_nodes: false,
            internode_length_scale: 1.0,
        }
    }
}

impl DrawOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.internode_length_scale.is_finite() && self.internode_length_scale >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "internode_length_scale",
                requirement: "finite and >= 0",
                value: self.internode_length_scale as f64,
            });
        }
        Ok(())
    }
}

/// A turtle bound to one root handle for one interpretation run.
#[derive(Clone, Debug)]
pub struct Turtle<H> {
    state: TurtleState<H>,
    stack: Vec<TurtleState<H>>,
    root: H,
    options: DrawOptions,
}

impl<H: Clone> Turtle<H> {
    /// Creates a turtle at the origin and asks `canvas` for the root it draws under.
    pub fn new<C>(canvas: &mut C, line_width: f32, attribute_index: i32, options: DrawOptions) -> Self
    where
        C: Canvas<Handle = H>,
    {
        let root = canvas.create_root();
        Self {
            state: TurtleState {
                transform: Transform::IDENTITY,
                line_width,
                attribute_index,
                current_parent: Some(root.clone()),
            },
            stack: Vec::new(),
            root,
            options,
        }
    }

    pub fn state(&self) -> &TurtleState<H> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TurtleState<H> {
        &mut self.state
    }

    pub fn into_state(self) -> TurtleState<H> {
        self.state
    }

    pub fn root(&self) -> &H {
        &self.root
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    /// Number of saved states not yet restored.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Moves along the heading by `step` (may be negative).
    pub fn move_forward(&mut self, step: f32) {
        let t = &mut self.state.transform;
        t.position += t.heading() * step;
    }

    /// Rotates about the local up axis.
    pub fn turn(&mut self, angle_degrees: f32) {
        self.state.transform.rotate_local(Vec3::Z, angle_degrees);
    }

    /// Rotates about the local left axis.
    pub fn pitch(&mut self, angle_degrees: f32) {
        self.state.transform.rotate_local(Vec3::Y, angle_degrees);
    }

    /// Rotates about the heading.
    pub fn roll(&mut self, angle_degrees: f32) {
        self.state.transform.rotate_local(Vec3::X, angle_degrees);
    }

    /// Saves the current state and opens a branch.
    ///
    /// With hierarchy enabled the branch gets its own parent (a node marker if
    /// nodes are drawn, an anchor otherwise); in flat mode a node marker is only
    /// placed when nodes are drawn.
    pub fn push<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Handle = H>,
    {
        self.stack.push(self.state.clone());

        match (self.options.hierarchy, self.options.draw_nodes) {
            (true, true) => {
                let node = self.draw_node(canvas, self.state.line_width);
                self.state.current_parent = Some(node);
            }
            (true, false) => {
                let anchor = canvas.place_anchor(&self.state.transform);
                canvas.attach_child(self.state.current_parent.as_ref(), &anchor);
                self.state.current_parent = Some(anchor);
            }
            (false, true) => {
                self.draw_node(canvas, self.state.line_width);
            }
            (false, false) => {}
        }
    }

    /// Restores the most recently saved state.
    pub fn pop(&mut self) -> Result<(), InterpretError> {
        self.state = self.stack.pop().ok_or(InterpretError::StackUnderflow)?;
        Ok(())
    }

    /// Draws an internode from the current position along the heading. Does not move.
    pub fn draw_internode<C>(&mut self, canvas: &mut C, length: f32, width: Option<f32>) -> H
    where
        C: Canvas<Handle = H>,
    {
        let width = width.unwrap_or(self.state.line_width);
        let internode = canvas.place_internode(
            &self.state.transform,
            length * self.options.internode_length_scale,
            width,
            self.state.effective_attribute_index(),
        );
        self.attach(canvas, &internode);
        internode
    }

    /// Draws a node marker at the current position.
    pub fn draw_node<C>(&mut self, canvas: &mut C, scale: f32) -> H
    where
        C: Canvas<Handle = H>,
    {
        let node = canvas.place_node(
            &self.state.transform,
            scale,
            self.state.effective_attribute_index(),
        );
        self.attach(canvas, &node);
        node
    }

    /// Draws a named host module at the current transform.
    pub fn draw_custom_module<C>(
        &mut self,
        canvas: &mut C,
        identifier: &str,
        scale: Vec3,
    ) -> Result<H, InterpretError>
    where
        C: Canvas<Handle = H>,
    {
        let module = canvas
            .place_custom_module(identifier, &self.state.transform, scale)
            .ok_or_else(|| InterpretError::UnknownModuleReference(identifier.to_string()))?;
        self.attach(canvas, &module);
        Ok(module)
    }

    fn attach<C>(&self, canvas: &mut C, child: &H)
    where
        C: Canvas<Handle = H>,
    {
        if self.options.hierarchy {
            canvas.attach_child(self.state.current_parent.as_ref(), child);
        } else {
            canvas.attach_child(Some(&self.root), child);
        }
    }
}
