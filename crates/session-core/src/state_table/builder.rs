use super::types::{CommandKind, StateKey, StateTable, Transition};
use crate::types::CallState;

/// Incremental builder for a [`StateTable`]
#[derive(Debug, Default)]
pub struct StateTableBuilder {
    table: StateTable,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition for one `(state, command)` pair. A later call for the
    /// same pair replaces the earlier one.
    pub fn add_transition(
        &mut self,
        state: CallState,
        command: CommandKind,
        transition: Transition,
    ) -> &mut Self {
        self.table.insert(StateKey::new(state, command), transition);
        self
    }

    /// Add the same transition for several states
    pub fn add_transition_from(
        &mut self,
        states: &[CallState],
        command: CommandKind,
        transition: Transition,
    ) -> &mut Self {
        for state in states {
            self.add_transition(*state, command, transition.clone());
        }
        self
    }

    /// Add a transition that applies in every state
    pub fn add_wildcard(&mut self, command: CommandKind, transition: Transition) -> &mut Self {
        self.table.insert_wildcard(command, transition);
        self
    }

    pub fn build(self) -> StateTable {
        self.table
    }
}
