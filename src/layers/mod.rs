//! Ordered layer registry mirroring the render stack for UI consumption.

use crate::scene::{ObjectId, StackEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Image,
    Text,
    Shape,
}

impl LayerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Shape => "shape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub id: ObjectId,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type LayerObserver = Box<dyn FnMut(&[Layer])>;

/// Back-to-front list of layers. An image layer is the background and is pinned to index 0.
#[derive(Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
    observers: Vec<(SubscriptionId, LayerObserver)>,
    next_subscription: u64,
}

impl std::fmt::Debug for LayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStore")
            .field("layers", &self.layers)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ObjectId, kind: LayerKind, at_front: bool) {
        if self.position(id).is_some() {
            return;
        }
        let layer = Layer { id, kind };
        if at_front || kind == LayerKind::Image {
            self.layers.push(layer);
        } else {
            let floor = usize::from(self.has_background());
            self.layers.insert(floor, layer);
        }
        self.clamp_background();
        self.notify();
    }

    pub fn remove(&mut self, id: ObjectId) {
        let Some(index) = self.position(id) else {
            return;
        };
        self.layers.remove(index);
        self.notify();
    }

    pub fn bring_to_front(&mut self, id: ObjectId) {
        let Some(index) = self.position(id) else {
            return;
        };
        let layer = self.layers.remove(index);
        self.layers.push(layer);
        self.clamp_background();
        self.notify();
    }

    pub fn send_to_back(&mut self, id: ObjectId) {
        let Some(index) = self.position(id) else {
            return;
        };
        let layer = self.layers.remove(index);
        self.layers.insert(0, layer);
        self.clamp_background();
        self.notify();
    }

    /// Rebuilds the list from the live render order, discarding previously tracked kinds.
    ///
    /// Observers only hear about it when the resulting list differs.
    pub fn reorder_from_render_stack(&mut self, entries: &[StackEntry]) {
        let mut rebuilt = Vec::with_capacity(entries.len());
        for entry in entries {
            if rebuilt.iter().any(|layer: &Layer| layer.id == entry.id) {
                continue;
            }
            rebuilt.push(Layer {
                id: entry.id,
                kind: entry.kind,
            });
        }
        if rebuilt == self.layers {
            return;
        }
        tracing::debug!(
            before = self.layers.len(),
            after = rebuilt.len(),
            "layer store resynchronized from render stack"
        );
        self.layers = rebuilt;
        self.clamp_background();
        self.notify();
    }

    pub fn clear(&mut self) {
        if self.layers.is_empty() {
            return;
        }
        self.layers.clear();
        self.notify();
    }

    pub fn list(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.layers.iter().map(|layer| layer.id).collect()
    }

    pub fn count(&self, kind: LayerKind) -> usize {
        self.layers.iter().filter(|layer| layer.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.position(id).is_some()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&[Layer]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn position(&self, id: ObjectId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    fn has_background(&self) -> bool {
        self.layers
            .first()
            .is_some_and(|layer| layer.kind == LayerKind::Image)
    }

    fn clamp_background(&mut self) {
        if let Some(index) = self
            .layers
            .iter()
            .position(|layer| layer.kind == LayerKind::Image)
        {
            if index != 0 {
                let background = self.layers.remove(index);
                self.layers.insert(0, background);
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.layers.clone();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(raw: u64) -> ObjectId {
        ObjectId::new(raw)
    }

    fn entry(raw: u64, kind: LayerKind) -> StackEntry {
        StackEntry { id: id(raw), kind }
    }

    #[test]
    fn background_image_is_index_zero_after_any_adds() {
        let mut store = LayerStore::new();
        store.add(id(2), LayerKind::Shape, true);
        store.add(id(1), LayerKind::Image, true);
        store.add(id(3), LayerKind::Text, true);
        store.add(id(4), LayerKind::Shape, false);
        let layers = store.list();
        assert_eq!(layers[0].id, id(1));
        assert_eq!(store.ids(), vec![id(1), id(4), id(2), id(3)]);
    }

    #[test]
    fn add_twice_keeps_single_entry() {
        let mut store = LayerStore::new();
        store.add(id(1), LayerKind::Text, true);
        store.add(id(1), LayerKind::Text, true);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn bring_to_front_then_send_to_back_round_trips_others() {
        let mut store = LayerStore::new();
        store.add(id(1), LayerKind::Image, true);
        for raw in 2..=5 {
            store.add(id(raw), LayerKind::Shape, true);
        }
        store.bring_to_front(id(3));
        store.send_to_back(id(3));
        let others: Vec<_> = store.ids().into_iter().filter(|i| *i != id(3)).collect();
        assert_eq!(others, vec![id(1), id(2), id(4), id(5)]);
        assert_eq!(store.ids()[0], id(1));
        assert_eq!(store.ids()[1], id(3));
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut store = LayerStore::new();
        store.add(id(1), LayerKind::Text, true);
        store.remove(id(9));
        store.bring_to_front(id(9));
        store.send_to_back(id(9));
        assert_eq!(store.ids(), vec![id(1)]);
    }

    #[test]
    fn reorder_from_render_stack_is_idempotent_and_reinfers_kinds() {
        let mut store = LayerStore::new();
        store.add(id(2), LayerKind::Image, true);
        let stack = [
            entry(1, LayerKind::Image),
            entry(3, LayerKind::Text),
            entry(2, LayerKind::Shape),
        ];
        store.reorder_from_render_stack(&stack);
        let first = store.list();
        store.reorder_from_render_stack(&stack);
        assert_eq!(store.list(), first);
        assert_eq!(first[2], Layer { id: id(2), kind: LayerKind::Shape });
        assert_eq!(store.count(LayerKind::Text), 1);
    }

    #[test]
    fn observers_see_changes_but_not_noop_resyncs() {
        let mut store = LayerStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(move |layers| sink.borrow_mut().push(layers.len()));

        store.add(id(1), LayerKind::Shape, true);
        store.reorder_from_render_stack(&[entry(1, LayerKind::Shape)]);
        store.add(id(2), LayerKind::Text, true);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(store.unsubscribe(subscription));
        store.remove(id(1));
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert!(!store.unsubscribe(subscription));
    }
}
