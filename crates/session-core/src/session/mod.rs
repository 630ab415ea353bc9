pub mod session;

pub use session::{CallSession, SessionContext, TeardownOutcome, TransitionOutcome};
