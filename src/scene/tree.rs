//! Scene: The tree of display objects.
//!
//! Objects live in a flat map keyed by [`ObjectId`]; parent/child links are
//! ids. Draw order is computed at traversal time from the sort-order
//! comparator, so changing a sort order takes effect on the next frame.

use super::object::{ObjectId, SceneObject};
use super::order::sort_by_order;
use crate::config::HostConfig;
use crate::error::{Result, SceneError};
use crate::geometry::Point;
use crate::input::SceneEvent;
use crate::render::{CellSize, FontRef, RenderData};
use crate::surface::CellSurface;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::collections::HashMap;

/// A tree of display objects plus the input routing state that goes with it.
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    roots: Vec<ObjectId>,
    next_id: u64,
    config: HostConfig,
    /// Focus stack; the last entry holds focus.
    pub(crate) focus: Vec<ObjectId>,
    /// Object the mouse resolved to last frame.
    pub(crate) last_mouse: Option<ObjectId>,
    listeners: Vec<Sender<SceneEvent>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new(config: HostConfig) -> Self {
        Self {
            objects: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
            config,
            focus: Vec::new(),
            last_mouse: None,
            listeners: Vec::new(),
        }
    }

    /// Creation defaults in effect.
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check if an object is in the scene.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Look up an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Look up an object for mutation.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub(crate) fn require(&self, id: ObjectId) -> Result<&SceneObject> {
        self.objects.get(&id).ok_or_else(|| SceneError::object_not_found(id))
    }

    fn require_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.objects.get_mut(&id).ok_or_else(|| SceneError::object_not_found(id))
    }

    /// Top-level objects.
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// All objects, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Add an object owning `surface`, under `parent` or at the top level.
    pub fn spawn(&mut self, surface: CellSurface, parent: Option<ObjectId>) -> Result<ObjectId> {
        if let Some(parent) = parent {
            self.require(parent)?;
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;

        self.objects.insert(id, SceneObject::new(id, surface, &self.config));
        self.attach(id, parent);
        self.update_absolute_positions(id);

        log::debug!("spawn object {id} under {parent:?}");
        Ok(id)
    }

    /// Remove an object and everything beneath it.
    ///
    /// Objects that held the mouse or focus get their exit and focus-lost
    /// notifications first. Returns the removed object, detached.
    pub fn remove(&mut self, id: ObjectId) -> Result<SceneObject> {
        let subtree = self.subtree(id)?;
        self.forget_input(&subtree);
        self.detach(id);

        let mut removed = None;
        for object_id in &subtree {
            if let Some(object) = self.objects.remove(object_id) {
                if *object_id == id {
                    removed = Some(object);
                }
            }
        }

        log::debug!("remove object {id} ({} objects)", subtree.len());
        let mut removed = removed.ok_or_else(|| SceneError::object_not_found(id))?;
        removed.children.clear();
        Ok(removed)
    }

    /// Move an object under a new parent (or to the top level).
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<()> {
        self.require(id)?;
        if let Some(parent) = parent {
            self.require(parent)?;
            if self.ancestors_and_self(parent).contains(&id) {
                return Err(SceneError::InvalidHierarchy {
                    child: id.get(),
                    parent: parent.get(),
                });
            }
        }

        if self.objects[&id].parent == parent {
            return Ok(());
        }

        self.detach(id);
        self.attach(id, parent);
        self.update_absolute_positions(id);
        log::debug!("reparent object {id} under {parent:?}");
        Ok(())
    }

    /// Change an object's position relative to its parent.
    pub fn set_position(&mut self, id: ObjectId, position: Point) -> Result<()> {
        let object = self.require_mut(id)?;
        if object.position != position {
            object.position = position;
            self.update_absolute_positions(id);
        }
        Ok(())
    }

    /// Choose whether an object is positioned relative to its parent.
    pub fn set_ignore_parent_position(&mut self, id: ObjectId, ignore: bool) -> Result<()> {
        self.require_mut(id)?.ignore_parent_position = ignore;
        self.update_absolute_positions(id);
        Ok(())
    }

    /// Choose whether an object's position is in pixels or cells.
    pub fn set_pixel_positioning(&mut self, id: ObjectId, pixels: bool) -> Result<()> {
        self.require_mut(id)?.use_pixel_positioning = pixels;
        self.update_absolute_positions(id);
        Ok(())
    }

    /// Change an object's font.
    ///
    /// The font size follows the new font's native size unless it has been
    /// overridden.
    pub fn set_font(&mut self, id: ObjectId, font: FontRef) -> Result<()> {
        let object = self.require_mut(id)?;
        object.font_size.change_original(font.cell_size());
        object.font = font;
        object.set_dirty(true);
        self.update_absolute_positions(id);
        Ok(())
    }

    /// Override an object's cell size.
    pub fn set_font_size(&mut self, id: ObjectId, size: CellSize) -> Result<()> {
        let object = self.require_mut(id)?;
        object.font_size.set(size);
        object.set_dirty(true);
        self.update_absolute_positions(id);
        Ok(())
    }

    /// Drop a font size override, going back to the font's native size.
    pub fn reset_font_size(&mut self, id: ObjectId) -> Result<()> {
        let object = self.require_mut(id)?;
        object.font_size.reset();
        object.set_dirty(true);
        self.update_absolute_positions(id);
        Ok(())
    }

    /// Re-order the stored children of `parent` (or the roots) by sort order.
    ///
    /// Draw order never depends on this; it sorts on every traversal.
    pub fn sort_children(&mut self, parent: Option<ObjectId>) -> Result<()> {
        let ids = match parent {
            Some(parent) => self.require(parent)?.children.clone(),
            None => self.roots.clone(),
        };
        let sorted = self.sorted(&ids);
        match parent {
            Some(parent) => self.require_mut(parent)?.children = sorted,
            None => self.roots = sorted,
        }
        Ok(())
    }

    /// Visible objects in draw order: siblings by ascending sort order,
    /// each object before its children. Hidden objects hide their subtree.
    pub fn draw_order(&self) -> Vec<ObjectId> {
        let mut order = Vec::with_capacity(self.objects.len());
        self.collect_visible(&self.roots, &mut order);
        order
    }

    /// Topmost mouse-enabled object whose area contains `position` (pixels).
    pub fn hit_test(&self, position: Point) -> Option<ObjectId> {
        self.draw_order().into_iter().rev().find(|id| {
            self.objects.get(id).is_some_and(|object| {
                object.use_mouse() && object.is_enabled() && object.absolute_area().contains(position)
            })
        })
    }

    /// Ids of `id` and its ancestors, nearest first.
    pub fn ancestors_and_self(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(object_id) = current {
            chain.push(object_id);
            current = self.objects.get(&object_id).and_then(SceneObject::parent);
        }
        chain
    }

    /// Listen for mouse and focus notifications.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        let (tx, rx) = match self.config.event_channel_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        self.listeners.push(tx);
        rx
    }

    pub(crate) fn emit(&mut self, event: SceneEvent) {
        log::trace!("scene event {event:?}");
        self.listeners.retain(|tx| match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("scene listener is full, dropped {event:?}");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    fn attach(&mut self, id: ObjectId, parent: Option<ObjectId>) {
        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent_object) => parent_object.children.push(id),
            None => self.roots.push(id),
        }
        if let Some(object) = self.objects.get_mut(&id) {
            object.parent = parent;
        }
    }

    fn detach(&mut self, id: ObjectId) {
        let parent = self.objects.get(&id).and_then(SceneObject::parent);
        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent_object) => parent_object.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        if let Some(object) = self.objects.get_mut(&id) {
            object.parent = None;
        }
    }

    /// `id` and all of its descendants, parents before children.
    fn subtree(&self, id: ObjectId) -> Result<Vec<ObjectId>> {
        self.require(id)?;
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            ids.push(current);
            if let Some(object) = self.objects.get(&current) {
                stack.extend(object.children.iter().rev().copied());
            }
        }
        Ok(ids)
    }

    fn update_absolute_positions(&mut self, id: ObjectId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let parent_position = self
                .objects
                .get(&current)
                .filter(|o| !o.ignore_parent_position)
                .and_then(SceneObject::parent)
                .and_then(|p| self.objects.get(&p))
                .map_or(Point::ZERO, SceneObject::absolute_position);

            if let Some(object) = self.objects.get_mut(&current) {
                let (sx, sy) = object.position_scale();
                object.absolute_position = parent_position + object.position.scale(sx, sy);
                stack.extend(object.children.iter().copied());
            }
        }
    }

    fn sorted(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut objects: Vec<&SceneObject> = ids.iter().filter_map(|id| self.objects.get(id)).collect();
        sort_by_order(&mut objects);
        objects.into_iter().map(SceneObject::id).collect()
    }

    fn collect_visible(&self, ids: &[ObjectId], order: &mut Vec<ObjectId>) {
        for id in self.sorted(ids) {
            let Some(object) = self.objects.get(&id) else {
                continue;
            };
            if object.is_visible() {
                order.push(id);
                self.collect_visible(&object.children, order);
            }
        }
    }

    /// Objects for the update pass: draw order restricted to enabled
    /// objects under enabled parents.
    pub(crate) fn update_order(&self) -> Vec<ObjectId> {
        self.draw_order()
            .into_iter()
            .filter(|id| {
                self.ancestors_and_self(*id)
                    .iter()
                    .all(|a| self.objects.get(a).is_some_and(SceneObject::is_enabled))
            })
            .collect()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("roots", &self.roots)
            .field("focus", &self.focus)
            .field("last_mouse", &self.last_mouse)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
