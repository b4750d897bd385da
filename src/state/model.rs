use crate::scene::ObjectId;

/// Selection state of the interaction controller. At most one object is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Selected(ObjectId),
    Editing(ObjectId),
}

impl InteractionState {
    pub const fn active_object(self) -> Option<ObjectId> {
        match self {
            Self::Idle => None,
            Self::Selected(id) | Self::Editing(id) => Some(id),
        }
    }

    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Editing(_))
    }
}
