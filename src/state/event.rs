use super::model::InteractionState;
use crate::scene::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    /// Pointer-down hit a selectable object, or an object was just created.
    Select(ObjectId),
    /// Double-click on the selected text object.
    BeginEditing,
    /// Blur or Escape while editing.
    Commit,
    /// Pointer-down on empty canvas, or Escape while selected.
    Deselect,
    /// The selected object was removed from the scene.
    Delete,
    /// The whole scene was cleared for a new source image.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<InteractionState>,
    pub event: InteractionEvent,
    pub to: InteractionState,
}

impl StateTransition {
    pub const fn new(
        from: Option<InteractionState>,
        event: InteractionEvent,
        to: InteractionState,
    ) -> Self {
        Self { from, event, to }
    }
}
