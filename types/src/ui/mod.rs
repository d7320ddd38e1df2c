//! UI state types shared by hosts and the flow engine.
//!
//! Pure data types with no IO, no async, no rendering dependency.

mod modal;

pub use modal::{DatePickerState, PICKER_PLACEHOLDER};
