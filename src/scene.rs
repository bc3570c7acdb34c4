use crate::canvas::Canvas;
use crate::turtle::Transform;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A unique identifier for a placed module.
pub type ModuleId = u32;

/// An engine-agnostic record of everything a turtle drew.
///
/// `SceneBlueprint` implements [`Canvas`] by storing each placed module together
/// with its world transform and parent link, so a host can ingest the result as
/// plain data (or serialize it) instead of driving its scene graph directly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneBlueprint {
    /// The ID of the root module, once created.
    pub root: Option<ModuleId>,

    /// Final world transform of the root.
    pub root_transform: Option<Mat4>,

    /// All placed modules, indexed by ID.
    pub modules: HashMap<ModuleId, SceneModule>,

    /// Names that `~` may reference.
    pub custom_modules: BTreeSet<String>,

    next_id: ModuleId,
}

impl SceneBlueprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom module name (builder pattern).
    pub fn with_custom_module(mut self, name: impl Into<String>) -> Self {
        self.register_custom_module(name);
        self
    }

    pub fn register_custom_module(&mut self, name: impl Into<String>) {
        self.custom_modules.insert(name.into());
    }

    pub fn module(&self, id: ModuleId) -> Option<&SceneModule> {
        self.modules.get(&id)
    }

    /// Modules in placement order.
    pub fn ordered(&self) -> Vec<(ModuleId, &SceneModule)> {
        let mut all: Vec<_> = self.modules.iter().map(|(id, m)| (*id, m)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Internodes in placement order.
    pub fn internodes(&self) -> Vec<(ModuleId, &SceneModule)> {
        self.ordered()
            .into_iter()
            .filter(|(_, m)| matches!(m.kind, ModuleKind::Internode { .. }))
            .collect()
    }

    /// Direct children of `parent`, in placement order.
    pub fn children(&self, parent: ModuleId) -> Vec<ModuleId> {
        self.ordered()
            .into_iter()
            .filter(|(_, m)| m.parent == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }

    fn add_module(&mut self, kind: ModuleKind, transform: Transform, attribute_index: u32) -> ModuleId {
        let id = self.next_id;
        self.next_id += 1;
        self.modules.insert(
            id,
            SceneModule {
                kind,
                transform,
                attribute_index,
                parent: None,
            },
        );
        id
    }
}

/// A single placed module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneModule {
    pub kind: ModuleKind,

    /// Turtle transform at placement time, in root space.
    pub transform: Transform,

    /// Attribute (material) slot the module was drawn with.
    pub attribute_index: u32,

    /// Module this one is attached to. `None` only for the root.
    pub parent: Option<ModuleId>,
}

impl SceneModule {
    /// The far end of an internode; the placement position for every other kind.
    pub fn end_point(&self) -> Vec3 {
        match self.kind {
            ModuleKind::Internode { length, .. } => {
                self.transform.position + self.transform.heading() * length
            }
            _ => self.transform.position,
        }
    }
}

/// What a module represents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModuleKind {
    Root,
    /// Invisible branch parent.
    Anchor,
    /// Branch-point marker with uniform scale.
    Node { scale: f32 },
    /// Segment along the heading.
    Internode { length: f32, width: f32 },
    /// Instance of a named host module.
    Custom { name: String, scale: Vec3 },
}

impl Canvas for SceneBlueprint {
    type Handle = ModuleId;

    fn create_root(&mut self) -> ModuleId {
        let id = self.add_module(ModuleKind::Root, Transform::IDENTITY, 0);
        self.root = Some(id);
        id
    }

    fn place_internode(
        &mut self,
        transform: &Transform,
        length: f32,
        width: f32,
        attribute_index: u32,
    ) -> ModuleId {
        self.add_module(
            ModuleKind::Internode { length, width },
            *transform,
            attribute_index,
        )
    }

    fn place_node(&mut self, transform: &Transform, scale: f32, attribute_index: u32) -> ModuleId {
        self.add_module(ModuleKind::Node { scale }, *transform, attribute_index)
    }

    fn place_anchor(&mut self, transform: &Transform) -> ModuleId {
        self.add_module(ModuleKind::Anchor, *transform, 0)
    }

    fn place_custom_module(
        &mut self,
        identifier: &str,
        transform: &Transform,
        scale: Vec3,
    ) -> Option<ModuleId> {
        if !self.custom_modules.contains(identifier) {
            return None;
        }
        Some(self.add_module(
            ModuleKind::Custom {
                name: identifier.to_string(),
                scale,
            },
            *transform,
            0,
        ))
    }

    fn attach_child(&mut self, parent: Option<&ModuleId>, child: &ModuleId) {
        let Some(parent) = parent else {
            return;
        };
        if let Some(module) = self.modules.get_mut(child) {
            module.parent = Some(*parent);
        }
    }

    fn orient_root(&mut self, root: &ModuleId, transform: Mat4) {
        if self.root == Some(*root) {
            self.root_transform = Some(transform);
        }
    }
}
