use super::*;

/// Render-order entry handed to the layer store during resynchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEntry {
    pub id: ObjectId,
    pub kind: LayerKind,
}

/// Back-to-front render stack. Index 0 is drawn first.
///
/// A background image, when present, always occupies index 0.
#[derive(Debug, Clone)]
pub struct SceneStack {
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl Default for SceneStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStack {
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        ObjectId::new(id)
    }

    /// Adds an object on top, or at the bottom when it is a background image.
    ///
    /// A second background replaces the first; the replaced object is returned.
    pub fn push(&mut self, object: SceneObject) -> Option<SceneObject> {
        if self.contains(object.id) {
            tracing::warn!(id = %object.id, "object already on render stack");
            return None;
        }
        if object.is_background() {
            let replaced = self.take_background();
            self.objects.insert(0, object);
            return replaced;
        }
        self.objects.push(object);
        None
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn background(&self) -> Option<&SceneObject> {
        self.objects.first().filter(|object| object.is_background())
    }

    pub fn background_mut(&mut self) -> Option<&mut SceneObject> {
        self.objects.first_mut().filter(|object| object.is_background())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|object| object.id).collect()
    }

    pub fn entries(&self) -> Vec<StackEntry> {
        self.objects
            .iter()
            .map(|object| StackEntry {
                id: object.id,
                kind: object.layer_kind(),
            })
            .collect()
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(index);
        self.objects.push(object);
        self.clamp_background();
        true
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(index);
        self.objects.insert(0, object);
        self.clamp_background();
        true
    }

    fn take_background(&mut self) -> Option<SceneObject> {
        let index = self.objects.iter().position(SceneObject::is_background)?;
        Some(self.objects.remove(index))
    }

    fn clamp_background(&mut self) {
        if let Some(index) = self.objects.iter().position(SceneObject::is_background) {
            if index != 0 {
                let background = self.objects.remove(index);
                self.objects.insert(0, background);
            }
        }
    }
}
