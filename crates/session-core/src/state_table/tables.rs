use super::builder::StateTableBuilder;
use super::types::{CommandKind, StateTable, Transition};
use crate::types::{CallState, DisconnectCause};

const LIVE_STATES: [CallState; 5] = [
    CallState::Initializing,
    CallState::Dialing,
    CallState::Ringing,
    CallState::Active,
    CallState::Held,
];

/// Build the default call lifecycle table
pub fn default_table() -> StateTable {
    let mut builder = StateTableBuilder::new();

    // Creation: the factory immediately moves a new session out of Initializing
    builder
        .add_transition(CallState::Initializing, CommandKind::Dial, Transition::to(CallState::Dialing))
        .add_transition(CallState::Initializing, CommandKind::Ring, Transition::to(CallState::Ringing));

    // Answer from anything that is not already active
    builder.add_transition_from(
        &[CallState::Initializing, CallState::Dialing, CallState::Ringing, CallState::Held],
        CommandKind::Answer,
        Transition::to(CallState::Active),
    );

    // Hold / resume; holding a held call has no entry and is ignored
    builder
        .add_transition(CallState::Active, CommandKind::Hold, Transition::to(CallState::Held))
        .add_transition(CallState::Held, CommandKind::Unhold, Transition::to(CallState::Active));

    // Every live state can end directly
    builder
        .add_transition_from(
            &LIVE_STATES,
            CommandKind::Reject,
            Transition::terminate(Some(DisconnectCause::Rejected)),
        )
        .add_transition_from(&LIVE_STATES, CommandKind::Disconnect, Transition::terminate(None))
        .add_transition_from(
            &LIVE_STATES,
            CommandKind::Abort,
            Transition::terminate(Some(DisconnectCause::Canceled)),
        );

    // Media commands are forwarded in any state
    for command in [
        CommandKind::PlayTone,
        CommandKind::StopTone,
        CommandKind::StartRtt,
        CommandKind::StopRtt,
    ] {
        builder.add_wildcard(command, Transition::forward());
    }

    builder.build()
}
