use crate::types::{CallState, DisconnectCause};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Command delivered to a call session, either by the platform call engine
/// or by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    // Issued by the session factory right after creation
    Dial,
    Ring,

    // Call control
    Answer,
    Reject,
    Disconnect(DisconnectCause),
    Hold,
    Unhold,
    Abort,

    // Media, never changes state
    PlayTone(char),
    StopTone,
    StartRtt,
    StopRtt,
}

impl SessionCommand {
    /// The command without its payload, used as part of the table key
    pub fn kind(&self) -> CommandKind {
        match self {
            SessionCommand::Dial => CommandKind::Dial,
            SessionCommand::Ring => CommandKind::Ring,
            SessionCommand::Answer => CommandKind::Answer,
            SessionCommand::Reject => CommandKind::Reject,
            SessionCommand::Disconnect(_) => CommandKind::Disconnect,
            SessionCommand::Hold => CommandKind::Hold,
            SessionCommand::Unhold => CommandKind::Unhold,
            SessionCommand::Abort => CommandKind::Abort,
            SessionCommand::PlayTone(_) => CommandKind::PlayTone,
            SessionCommand::StopTone => CommandKind::StopTone,
            SessionCommand::StartRtt => CommandKind::StartRtt,
            SessionCommand::StopRtt => CommandKind::StopRtt,
        }
    }

    /// Disconnect cause carried by the command, if any
    pub fn cause(&self) -> Option<DisconnectCause> {
        match self {
            SessionCommand::Disconnect(cause) => Some(*cause),
            _ => None,
        }
    }
}

/// Payload-free command discriminant
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    Dial,
    Ring,
    Answer,
    Reject,
    Disconnect,
    Hold,
    Unhold,
    Abort,
    PlayTone,
    StopTone,
    StartRtt,
    StopRtt,
}

/// Key for looking up transitions in the state table
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateKey {
    pub state: CallState,
    pub command: CommandKind,
}

impl StateKey {
    pub fn new(state: CallState, command: CommandKind) -> Self {
        Self { state, command }
    }
}

/// Side effect executed after the state has been updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Tell the platform connection about the new state
    SignalState,
    /// Forward the command's media request to the platform
    ForwardMedia,
    /// Run terminal cleanup (platform destroy + registry unregister)
    Destroy,
}

/// A single transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Next state (if changing)
    pub next_state: Option<CallState>,

    /// Fixed disconnect cause. `None` means the cause comes from the command,
    /// falling back to `Unspecified`.
    pub cause: Option<DisconnectCause>,

    /// Actions to execute, in order
    pub actions: Vec<Action>,
}

impl Transition {
    /// Transition to a non-terminal state that the platform must be told about
    pub fn to(state: CallState) -> Self {
        Self {
            next_state: Some(state),
            cause: None,
            actions: vec![Action::SignalState],
        }
    }

    /// Transition into `Disconnected` followed by teardown
    pub fn terminate(cause: Option<DisconnectCause>) -> Self {
        Self {
            next_state: Some(CallState::Disconnected),
            cause,
            actions: vec![Action::SignalState, Action::Destroy],
        }
    }

    /// Stateless forwarding of a media command
    pub fn forward() -> Self {
        Self {
            next_state: None,
            cause: None,
            actions: vec![Action::ForwardMedia],
        }
    }
}

/// Transition table for the call session state machine.
///
/// Exact `(state, command)` entries take precedence over wildcard entries,
/// which apply in every state. A command with no entry is ignored by the
/// session.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    pub(crate) transitions: HashMap<StateKey, Transition>,
    pub(crate) wildcard_transitions: HashMap<CommandKind, Transition>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: StateKey, transition: Transition) {
        self.transitions.insert(key, transition);
    }

    pub fn insert_wildcard(&mut self, command: CommandKind, transition: Transition) {
        self.wildcard_transitions.insert(command, transition);
    }

    /// Find the transition for `command` in `state`
    pub fn get(&self, state: CallState, command: CommandKind) -> Option<&Transition> {
        self.transitions
            .get(&StateKey::new(state, command))
            .or_else(|| self.wildcard_transitions.get(&command))
    }

    pub fn has_transition(&self, state: CallState, command: CommandKind) -> bool {
        self.get(state, command).is_some()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len() + self.wildcard_transitions.len()
    }

    /// Collect all states referenced in this state table
    pub fn collect_used_states(&self) -> HashSet<CallState> {
        let mut states = HashSet::new();
        for (key, transition) in &self.transitions {
            states.insert(key.state);
            if let Some(next_state) = transition.next_state {
                states.insert(next_state);
            }
        }
        for transition in self.wildcard_transitions.values() {
            if let Some(next_state) = transition.next_state {
                states.insert(next_state);
            }
        }
        states
    }

    /// Check the structural rules every table must satisfy:
    ///
    /// - nothing leaves `Disconnected`
    /// - wildcard entries never change state
    /// - every entry into `Disconnected` runs `Destroy`
    /// - every non-terminal state can reach `Disconnected` directly
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (key, transition) in &self.transitions {
            if key.state.is_terminal() && transition.next_state.is_some() {
                errors.push(format!(
                    "Terminal state {} has a state-changing transition on {:?}",
                    key.state, key.command
                ));
            }
            if transition.next_state == Some(CallState::Disconnected)
                && !transition.actions.contains(&Action::Destroy)
            {
                errors.push(format!(
                    "{} --{:?}--> Disconnected does not destroy the session",
                    key.state, key.command
                ));
            }
        }

        for (command, transition) in &self.wildcard_transitions {
            if transition.next_state.is_some() {
                errors.push(format!("Wildcard transition on {:?} changes state", command));
            }
        }

        for state in CallState::ALL.iter().filter(|s| !s.is_terminal()) {
            let can_terminate = self.transitions.iter().any(|(key, transition)| {
                key.state == *state && transition.next_state == Some(CallState::Disconnected)
            });
            if !can_terminate {
                errors.push(format!("State {} cannot reach Disconnected", state));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
