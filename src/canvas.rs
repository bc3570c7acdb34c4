//! The drawing collaborator the turtle places modules through.

use crate::turtle::Transform;
use glam::{Mat4, Vec3};

/// A host-side sink for the geometry produced by a turtle.
///
/// The turtle never builds geometry itself; it only asks the canvas to
/// instantiate modules at its current transform and to link them into a
/// hierarchy. Handles are opaque to the turtle and are cloned into saved states.
pub trait Canvas {
    type Handle: Clone;

    /// Creates the root every other module ends up under.
    fn create_root(&mut self) -> Self::Handle;

    /// Places an internode spanning `length` along the turtle heading (+X).
    fn place_internode(
        &mut self,
        transform: &Transform,
        length: f32,
        width: f32,
        attribute_index: u32,
    ) -> Self::Handle;

    /// Places a node marker with uniform `scale`.
    fn place_node(&mut self, transform: &Transform, scale: f32, attribute_index: u32)
    -> Self::Handle;

    /// Places an invisible anchor used as the parent of a branch.
    fn place_anchor(&mut self, transform: &Transform) -> Self::Handle;

    /// Places a named host module, or returns `None` if `identifier` does not resolve.
    fn place_custom_module(
        &mut self,
        identifier: &str,
        transform: &Transform,
        scale: Vec3,
    ) -> Option<Self::Handle>;

    /// Links `child` under `parent`. In flat mode `parent` is the root and the
    /// canvas may merge the child into it.
    fn attach_child(&mut self, parent: Option<&Self::Handle>, child: &Self::Handle);

    /// Applies the final world transform of the root.
    fn orient_root(&mut self, root: &Self::Handle, transform: Mat4);
}
