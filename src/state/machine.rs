use super::error::{StateError, StateResult};
use super::{InteractionEvent, InteractionState, StateTransition};

const TRANSITION_HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct StateMachine {
    state: InteractionState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn can_transition(&self, event: InteractionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: InteractionEvent) -> Option<InteractionState> {
        use InteractionEvent::*;
        use InteractionState::{Editing, Idle, Selected};
        match (self.state, event) {
            (Idle | Selected(_), Select(id)) => Some(Selected(id)),
            (Selected(id), BeginEditing) => Some(Editing(id)),
            (Editing(id), Commit) => Some(Selected(id)),
            (Selected(_), Deselect) => Some(Idle),
            (Selected(_), Delete) => Some(Idle),
            (_, Reset) => Some(Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: InteractionEvent) -> StateResult<InteractionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request interaction transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(
                from = ?from,
                event = ?event,
                "invalid interaction transition requested"
            );
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.remove(0);
        }
        self.transition_history.push(record);

        Ok(self.state)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionState::{:?}", self.state)
    }
}
