//! Table-driven transition function for call sessions.
//!
//! The call session never decides on its own which commands are legal: it
//! looks up `(current state, command)` in a [`StateTable`] and executes the
//! [`Action`]s of the matching [`Transition`]. The default table lives in
//! [`tables`]; embedders may build their own with [`StateTableBuilder`] as
//! long as it passes [`StateTable::validate`].

pub mod builder;
pub mod tables;
pub mod types;

pub use builder::StateTableBuilder;
pub use tables::default_table;
pub use types::*;
