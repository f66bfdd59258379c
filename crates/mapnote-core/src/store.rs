//! Element store: layers plus the elements they contain.
//!
//! The store is the single writable owner of geometry. Public reads hand out
//! copies; every write validates first and reports the applied change as the
//! [`EditorEvent`] to publish.

use crate::element::{Element, ElementId};
use crate::events::{EditorEvent, RemovedElement};
use crate::layer::{Layer, LayerId, LayerProps};
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Reasons the store refuses a change.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("invalid element: {0}")]
    Invalid(String),
    #[error("layer {0} is locked")]
    LayerLocked(LayerId),
    #[error("element {0} is locked")]
    ElementLocked(ElementId),
    #[error("the base layer cannot be modified")]
    BaseLayer,
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("duplicate element id: {0}")]
    Duplicate(ElementId),
    #[error("at least one drawable layer must remain")]
    LastLayer,
    #[error("layer {0} cannot move further")]
    CannotMove(LayerId),
    #[error("nothing to remove")]
    NothingToRemove,
}

/// A change requested by a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Commit a new element into its layer.
    AddElement(Element),
    /// Replace an element (matched by id) with a new version.
    UpdateElement(Element),
    /// Remove a batch of elements.
    RemoveElements(Vec<ElementId>),
}

/// Layers and elements of one project.
#[derive(Debug, Clone)]
pub struct ElementStore {
    /// Layers, bottom to top. The base layer is always at index 0.
    layers: Vec<Layer>,
    elements: HashMap<ElementId, Element>,
    /// Index into `layers` of the layer new elements go to.
    active: usize,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    /// A store with the base layer and one empty drawable layer, which is active.
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::base(), Layer::new(LayerId::generate(), "Layer 1")],
            elements: HashMap::new(),
            active: 1,
        }
    }

    /// Rebuild a store from snapshot parts.
    ///
    /// Elements whose layer is missing, or that fail validation, are dropped
    /// with a warning. A missing base layer is recreated.
    pub fn from_parts(layers: Vec<Layer>, elements: Vec<Element>) -> Self {
        let mut base = None;
        let mut others = Vec::new();
        for mut layer in layers {
            layer.elements.clear();
            if layer.is_base() {
                layer.locked = true;
                base = Some(layer);
            } else {
                others.push(layer);
            }
        }
        if others.is_empty() {
            others.push(Layer::new(LayerId::generate(), "Layer 1"));
        }
        let mut store = Self {
            layers: std::iter::once(base.unwrap_or_else(Layer::base)).chain(others).collect(),
            elements: HashMap::new(),
            active: 0,
        };
        store.active = store.layers.len() - 1;

        for mut element in elements {
            element.is_temp = false;
            if let Err(err) = element.validate() {
                log::warn!("Dropping element {} on load: {}", element.id, err);
                continue;
            }
            if store.elements.contains_key(&element.id) {
                log::warn!("Dropping duplicate element {} on load", element.id);
                continue;
            }
            let Some(layer) = store.layers.iter_mut().find(|l| l.id == element.layer_id) else {
                log::warn!("Dropping element {}: layer {} not found", element.id, element.layer_id);
                continue;
            };
            layer.elements.push(element.id);
            store.elements.insert(element.id, element);
        }
        store
    }

    /// Split into snapshot parts: layers bottom to top, elements in z-order.
    pub fn to_parts(&self) -> (Vec<Layer>, Vec<Element>) {
        (self.layers.clone(), self.elements())
    }

    // ---- reads -------------------------------------------------------------

    /// All layers, bottom to top.
    pub fn layers(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    pub fn layer(&self, id: &LayerId) -> Option<Layer> {
        self.layer_ref(id).cloned()
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.get(&id).cloned()
    }

    /// All elements, bottom layer first, each layer in z-order.
    pub fn elements(&self) -> Vec<Element> {
        self.layers
            .iter()
            .flat_map(|l| l.elements.iter())
            .filter_map(|id| self.elements.get(id).cloned())
            .collect()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_layer(&self) -> Layer {
        self.layers[self.active].clone()
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.layers[self.active].id.clone()
    }

    /// Whether tools may draw onto the active layer.
    pub fn can_draw(&self) -> bool {
        self.layers[self.active].accepts_drawing()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Whether an element may be modified or removed by the user.
    pub fn is_editable(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|e| {
            !e.locked && self.layer_ref(&e.layer_id).is_some_and(|l| !l.locked)
        })
    }

    pub(crate) fn element_ref(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn layer_ref(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    fn layer_index(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    /// Visible elements from topmost to bottommost.
    fn visible_topmost_first(&self) -> impl Iterator<Item = &Element> {
        self.layers
            .iter()
            .rev()
            .filter(|l| l.visible)
            .flat_map(|l| l.elements.iter().rev())
            .filter_map(|id| self.elements.get(id))
            .filter(|e| e.visible)
    }

    /// Elements under a point, topmost first.
    pub fn elements_at(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.visible_topmost_first()
            .filter(|e| e.hit_test(point, tolerance))
            .map(|e| e.id)
            .collect()
    }

    /// Topmost element under a point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.visible_topmost_first()
            .find(|e| e.hit_test(point, tolerance))
            .map(|e| e.id)
    }

    /// Elements with at least one test point inside `rect`, topmost first.
    pub fn elements_in_box(&self, rect: Rect) -> Vec<ElementId> {
        self.visible_topmost_first()
            .filter(|e| e.intersects_box(rect))
            .map(|e| e.id)
            .collect()
    }

    /// Check that every element sits in exactly one layer, which it names.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for layer in &self.layers {
            for id in &layer.elements {
                if !seen.insert(*id) {
                    return Err(format!("element {} listed twice", id));
                }
                match self.elements.get(id) {
                    Some(e) if e.layer_id == layer.id => {}
                    Some(e) => {
                        return Err(format!("element {} names {} but sits in {}", id, e.layer_id, layer.id));
                    }
                    None => return Err(format!("layer {} lists unknown element {}", layer.id, id)),
                }
            }
        }
        if seen.len() != self.elements.len() {
            return Err("some elements are not in any layer".to_string());
        }
        if self.active >= self.layers.len() {
            return Err(format!("active index {} out of range", self.active));
        }
        Ok(())
    }

    // ---- element writes ----------------------------------------------------

    /// Apply a tool mutation.
    pub fn apply(&mut self, mutation: Mutation) -> Result<EditorEvent, StoreError> {
        match mutation {
            Mutation::AddElement(element) => self.add_element(element),
            Mutation::UpdateElement(element) => self.update_element(element),
            Mutation::RemoveElements(ids) => self.remove_elements(&ids),
        }
    }

    /// Commit an element into the layer it names.
    pub fn add_element(&mut self, mut element: Element) -> Result<EditorEvent, StoreError> {
        element.validate().map_err(StoreError::Invalid)?;
        if self.elements.contains_key(&element.id) {
            return Err(StoreError::Duplicate(element.id));
        }
        let index = self
            .layer_index(&element.layer_id)
            .ok_or_else(|| StoreError::LayerNotFound(element.layer_id.clone()))?;
        let layer = &mut self.layers[index];
        if layer.is_base() {
            return Err(StoreError::BaseLayer);
        }
        if layer.locked {
            return Err(StoreError::LayerLocked(layer.id.clone()));
        }

        element.is_temp = false;
        layer.elements.push(element.id);
        self.elements.insert(element.id, element.clone());
        Ok(EditorEvent::ElementAdded { element })
    }

    /// Replace an element with a new version of itself.
    ///
    /// Locked elements only accept a change of their `locked` flag.
    pub fn update_element(&mut self, mut after: Element) -> Result<EditorEvent, StoreError> {
        let before = self
            .elements
            .get(&after.id)
            .cloned()
            .ok_or(StoreError::ElementNotFound(after.id))?;
        after.is_temp = false;
        after.validate().map_err(StoreError::Invalid)?;

        let from = self
            .layer_ref(&before.layer_id)
            .ok_or_else(|| StoreError::LayerNotFound(before.layer_id.clone()))?;
        if from.locked {
            return Err(StoreError::LayerLocked(from.id.clone()));
        }
        let index = from.position(before.id).unwrap_or_default();
        if before.locked {
            let mut unlocked = before.clone();
            unlocked.locked = after.locked;
            if unlocked != after {
                return Err(StoreError::ElementLocked(before.id));
            }
        }
        if after.layer_id != before.layer_id {
            let to = self
                .layer_ref(&after.layer_id)
                .ok_or_else(|| StoreError::LayerNotFound(after.layer_id.clone()))?;
            if !to.accepts_drawing() {
                return Err(StoreError::LayerLocked(to.id.clone()));
            }
        }

        self.replace_element(after.clone())?;
        Ok(EditorEvent::ElementModified { before, after, index })
    }

    /// Remove a batch of elements. Missing or locked ids are skipped.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Result<EditorEvent, StoreError> {
        let mut unique = Vec::new();
        for &id in ids {
            if unique.contains(&id) {
                continue;
            }
            if !self.is_editable(id) {
                log::warn!("Skipping removal of {}: missing or locked", id);
                continue;
            }
            unique.push(id);
        }
        if unique.is_empty() {
            return Err(StoreError::NothingToRemove);
        }

        // Record positions before anything moves.
        let mut removed = Vec::with_capacity(unique.len());
        for &id in &unique {
            let element = self.elements[&id].clone();
            let index = self
                .layer_ref(&element.layer_id)
                .and_then(|l| l.position(id))
                .unwrap_or(0);
            removed.push(RemovedElement { element, index });
        }
        for &id in &unique {
            self.discard_element(id);
        }
        Ok(EditorEvent::ElementsRemoved { removed })
    }

    // ---- unchecked writes used by history replay ---------------------------

    /// Put an element back at `index` in its layer, ignoring locks.
    pub(crate) fn restore_element(&mut self, element: Element, index: usize) -> Result<(), StoreError> {
        let layer_index = self
            .layer_index(&element.layer_id)
            .ok_or_else(|| StoreError::LayerNotFound(element.layer_id.clone()))?;
        if self.elements.contains_key(&element.id) {
            return Err(StoreError::Duplicate(element.id));
        }
        let layer = &mut self.layers[layer_index];
        let index = index.min(layer.elements.len());
        layer.elements.insert(index, element.id);
        self.elements.insert(element.id, element);
        Ok(())
    }

    /// Append an element to its layer, ignoring locks.
    pub(crate) fn push_element(&mut self, element: Element) -> Result<(), StoreError> {
        let len = self
            .layer_ref(&element.layer_id)
            .map(|l| l.elements.len())
            .ok_or_else(|| StoreError::LayerNotFound(element.layer_id.clone()))?;
        self.restore_element(element, len)
    }

    /// Remove an element wherever it is, ignoring locks.
    pub(crate) fn discard_element(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == element.layer_id) {
            layer.elements.retain(|&e| e != id);
        }
        Some(element)
    }

    /// Swap in a new version of an element, moving it to the top of its new
    /// layer if the layer changed.
    pub(crate) fn replace_element(&mut self, element: Element) -> Result<(), StoreError> {
        self.replace_element_at(element, usize::MAX)
    }

    /// Like [`replace_element`](Self::replace_element), but a layer move
    /// lands at `index` in the target layer.
    pub(crate) fn replace_element_at(&mut self, element: Element, index: usize) -> Result<(), StoreError> {
        let current_layer = self
            .elements
            .get(&element.id)
            .map(|e| e.layer_id.clone())
            .ok_or(StoreError::ElementNotFound(element.id))?;
        if current_layer == element.layer_id {
            self.elements.insert(element.id, element);
            return Ok(());
        }
        if self.layer_ref(&element.layer_id).is_none() {
            return Err(StoreError::LayerNotFound(element.layer_id.clone()));
        }
        self.discard_element(element.id);
        self.restore_element(element, index)
    }

    /// Overwrite layer properties, ignoring locks.
    pub(crate) fn replace_layer_props(&mut self, id: &LayerId, props: LayerProps) -> Result<(), StoreError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| StoreError::LayerNotFound(id.clone()))?;
        layer.set_props(props);
        Ok(())
    }

    // ---- layer writes ------------------------------------------------------

    /// Add a drawable layer on top of the stack.
    pub fn add_layer(&mut self, name: impl Into<String>) -> EditorEvent {
        let layer = Layer::new(LayerId::generate(), name);
        self.layers.push(layer.clone());
        EditorEvent::LayerAdded { layer }
    }

    /// Remove a layer and every element it holds.
    ///
    /// The base layer can never be removed, and at least one drawable layer
    /// always remains. The active pointer is kept on a valid layer.
    pub fn remove_layer(&mut self, id: &LayerId) -> Result<EditorEvent, StoreError> {
        let index = self.layer_index(id).ok_or_else(|| StoreError::LayerNotFound(id.clone()))?;
        if self.layers[index].is_base() {
            return Err(StoreError::BaseLayer);
        }
        let drawable = self.layers.iter().filter(|l| !l.is_base()).count();
        if drawable <= 1 {
            return Err(StoreError::LastLayer);
        }

        let layer = self.layers.remove(index);
        for element_id in &layer.elements {
            self.elements.remove(element_id);
        }

        if index < self.active {
            self.active -= 1;
        } else if index == self.active {
            // Prefer the layer that slid into the removed slot, then the one below.
            let candidate = index.min(self.layers.len() - 1);
            self.active = if self.layers[candidate].is_base() {
                (candidate + 1).min(self.layers.len() - 1)
            } else {
                candidate
            };
        }
        Ok(EditorEvent::LayerRemoved { layer })
    }

    /// Swap a layer with its neighbour (`delta` is +1 for up, -1 for down).
    ///
    /// The base layer stays at the bottom.
    pub fn move_layer(&mut self, id: &LayerId, delta: i32) -> Result<EditorEvent, StoreError> {
        let index = self.layer_index(id).ok_or_else(|| StoreError::LayerNotFound(id.clone()))?;
        if self.layers[index].is_base() {
            return Err(StoreError::BaseLayer);
        }
        let target = index as i64 + i64::from(delta.signum());
        if delta == 0 || target < 1 || target >= self.layers.len() as i64 {
            return Err(StoreError::CannotMove(id.clone()));
        }
        let target = target as usize;

        self.layers.swap(index, target);
        if self.active == index {
            self.active = target;
        } else if self.active == target {
            self.active = index;
        }
        Ok(EditorEvent::LayersReordered {
            order: self.layers.iter().map(|l| l.id.clone()).collect(),
        })
    }

    /// Point the active-layer pointer at `id`.
    pub fn set_active_layer(&mut self, id: &LayerId) -> Result<EditorEvent, StoreError> {
        let index = self.layer_index(id).ok_or_else(|| StoreError::LayerNotFound(id.clone()))?;
        self.active = index;
        Ok(EditorEvent::LayerActivated { id: id.clone() })
    }

    /// Change a layer's properties. The base layer is immutable.
    pub fn update_layer(&mut self, id: &LayerId, props: LayerProps) -> Result<EditorEvent, StoreError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| StoreError::LayerNotFound(id.clone()))?;
        if layer.is_base() {
            return Err(StoreError::BaseLayer);
        }
        if !props.opacity.is_finite() || !(0.0..=1.0).contains(&props.opacity) {
            return Err(StoreError::Invalid(format!("layer opacity {} out of range", props.opacity)));
        }
        let before = layer.props();
        layer.set_props(props.clone());
        Ok(EditorEvent::LayerModified {
            id: id.clone(),
            before,
            after: props,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    fn rect_on(layer: &LayerId, x: f64, y: f64) -> Element {
        let mut e = Element::new(ShapeKind::Rect, "zone", layer.clone());
        e.set_box(Point::new(x, y), Point::new(x + 10.0, y + 10.0));
        e
    }

    #[test]
    fn test_new_store_layout() {
        let store = ElementStore::new();
        let layers = store.layers();
        assert_eq!(layers.len(), 2);
        assert!(layers[0].is_base());
        assert_eq!(store.active_index(), 1);
        assert!(store.can_draw());
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_add_and_read_copies() {
        let mut store = ElementStore::new();
        let layer = store.active_layer_id();
        let element = rect_on(&layer, 0.0, 0.0);
        let id = element.id;
        store.add_element(element).unwrap();

        let mut copy = store.element(id).unwrap();
        copy.x = 500.0;
        assert!((store.element(id).unwrap().x - 0.0).abs() < f64::EPSILON);
        assert_eq!(store.layer(&layer).unwrap().elements, vec![id]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_add_refusals() {
        let mut store = ElementStore::new();
        let base = LayerId::base();
        assert_eq!(store.add_element(rect_on(&base, 0.0, 0.0)), Err(StoreError::BaseLayer));

        let layer = store.active_layer_id();
        let mut props = store.layer(&layer).unwrap().props();
        props.locked = true;
        store.update_layer(&layer, props).unwrap();
        assert!(matches!(store.add_element(rect_on(&layer, 0.0, 0.0)), Err(StoreError::LayerLocked(_))));

        let ghost = LayerId::new("ghost");
        assert!(matches!(store.add_element(rect_on(&ghost, 0.0, 0.0)), Err(StoreError::LayerNotFound(_))));

        let mut bad = rect_on(&layer, 0.0, 0.0);
        bad.width = f64::INFINITY;
        assert!(matches!(store.add_element(bad), Err(StoreError::Invalid(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_element_reports_before_after() {
        let mut store = ElementStore::new();
        let layer = store.active_layer_id();
        let element = rect_on(&layer, 0.0, 0.0);
        store.add_element(element.clone()).unwrap();

        let mut moved = element.clone();
        moved.translate(20.0, 0.0);
        match store.update_element(moved.clone()).unwrap() {
            EditorEvent::ElementModified { before, after, index } => {
                assert_eq!(before, element);
                assert_eq!(after, moved);
                assert_eq!(index, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_locked_element_only_unlocks() {
        let mut store = ElementStore::new();
        let layer = store.active_layer_id();
        let mut element = rect_on(&layer, 0.0, 0.0);
        element.locked = true;
        store.add_element(element.clone()).unwrap();

        let mut moved = element.clone();
        moved.translate(5.0, 5.0);
        assert_eq!(store.update_element(moved), Err(StoreError::ElementLocked(element.id)));

        let mut unlocked = element.clone();
        unlocked.locked = false;
        assert!(store.update_element(unlocked).is_ok());
    }

    #[test]
    fn test_remove_batch_dedupes_and_records_positions() {
        let mut store = ElementStore::new();
        let layer = store.active_layer_id();
        let a = rect_on(&layer, 0.0, 0.0);
        let b = rect_on(&layer, 20.0, 0.0);
        let c = rect_on(&layer, 40.0, 0.0);
        for e in [&a, &b, &c] {
            store.add_element(e.clone()).unwrap();
        }

        let event = store.remove_elements(&[c.id, a.id, c.id]).unwrap();
        let EditorEvent::ElementsRemoved { removed } = event else {
            panic!("expected removal");
        };
        let got: Vec<(ElementId, usize)> = removed.iter().map(|r| (r.element.id, r.index)).collect();
        assert_eq!(got, vec![(c.id, 2), (a.id, 0)]);
        assert_eq!(store.layer(&layer).unwrap().elements, vec![b.id]);
        assert_eq!(store.remove_elements(&[a.id]), Err(StoreError::NothingToRemove));
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_hit_testing_topmost_first() {
        let mut store = ElementStore::new();
        let lower = store.active_layer_id();
        let bottom = rect_on(&lower, 0.0, 0.0);
        store.add_element(bottom.clone()).unwrap();

        let EditorEvent::LayerAdded { layer: upper } = store.add_layer("Upper") else {
            panic!("expected layer");
        };
        let top = rect_on(&upper.id, 5.0, 5.0);
        store.add_element(top.clone()).unwrap();

        assert_eq!(store.elements_at(Point::new(7.0, 7.0), 0.0), vec![top.id, bottom.id]);
        assert_eq!(store.element_at(Point::new(2.0, 2.0), 0.0), Some(bottom.id));

        let mut props = upper.props();
        props.visible = false;
        store.update_layer(&upper.id, props).unwrap();
        assert_eq!(store.element_at(Point::new(7.0, 7.0), 0.0), Some(bottom.id));
    }

    #[test]
    fn test_remove_layer_rules() {
        let mut store = ElementStore::new();
        let first = store.active_layer_id();
        assert_eq!(store.remove_layer(&LayerId::base()), Err(StoreError::BaseLayer));
        assert_eq!(store.remove_layer(&first), Err(StoreError::LastLayer));

        store.add_layer("Second");
        store.add_element(rect_on(&first, 0.0, 0.0)).unwrap();
        store.remove_layer(&first).unwrap();
        assert!(store.is_empty());
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_active_layer_repoints() {
        let mut store = ElementStore::new();
        store.add_layer("Second");
        let EditorEvent::LayerAdded { layer: third } = store.add_layer("Third") else {
            panic!("expected layer");
        };
        store.set_active_layer(&third.id).unwrap();
        assert_eq!(store.active_index(), 3);

        store.remove_layer(&third.id).unwrap();
        assert_eq!(store.active_index(), 2);
        assert!(store.can_draw());

        let second = store.active_layer_id();
        store.set_active_layer(&second).unwrap();
        let first = store.layers()[1].id.clone();
        store.set_active_layer(&first).unwrap();
        store.remove_layer(&first).unwrap();
        assert_eq!(store.active_index(), 1);
        assert_eq!(store.active_layer_id(), second);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_move_layer_tracks_active() {
        let mut store = ElementStore::new();
        let first = store.active_layer_id();
        let EditorEvent::LayerAdded { layer: second } = store.add_layer("Second") else {
            panic!("expected layer");
        };

        store.move_layer(&first, 1).unwrap();
        assert_eq!(store.active_layer_id(), first);
        assert_eq!(store.active_index(), 2);

        store.move_layer(&first, -1).unwrap();
        assert_eq!(store.active_index(), 1);

        store.set_active_layer(&second.id).unwrap();
        store.move_layer(&first, 1).unwrap();
        assert_eq!(store.active_layer_id(), second.id);
        assert_eq!(store.active_index(), 1);

        assert_eq!(store.move_layer(&second.id, -1), Err(StoreError::CannotMove(second.id.clone())));
        assert_eq!(store.move_layer(&LayerId::base(), 1), Err(StoreError::BaseLayer));
    }

    #[test]
    fn test_from_parts_repairs() {
        let layer = Layer::new(LayerId::new("roads"), "Roads");
        let good = rect_on(&layer.id, 0.0, 0.0);
        let orphan = rect_on(&LayerId::new("missing"), 0.0, 0.0);
        let store = ElementStore::from_parts(vec![layer.clone()], vec![good.clone(), orphan]);

        assert!(store.layers()[0].is_base());
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_layer_id(), layer.id);
        assert_eq!(store.layer(&layer.id).unwrap().elements, vec![good.id]);
        store.check_invariants().unwrap();
    }
}
