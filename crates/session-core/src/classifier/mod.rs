//! Signal Classifier
//!
//! Converts the platform's raw call-state stream (`IDLE`, `RINGING`,
//! `OFFHOOK`) into events that say what happened: a call came in, went out,
//! was answered or ended.
//!
//! | previous | new | direction |
//! |---|---|---|
//! | any | `Ringing` | `INCOMING` |
//! | `Ringing` | `OffHook` | `ANSWERED` |
//! | other | `OffHook` | `OUTGOING` |
//! | `OffHook`, `Ringing` | `Idle` | `ENDED` |
//! | `Idle` | `Idle` | `IDLE` |

pub mod classifier;
pub mod types;

pub use classifier::{CallStateSink, SignalClassifier};
pub use types::{
    CallStateChanged, ClassifierState, DerivedDirection, RawCallState, TelephonySignal,
};
