//! Auxiliary date picker coordination.
//!
//! Commits flow into the owning step's field value. The picker is force
//! closed whenever the current step changes, so it can never write into a
//! step the user has already left.

use chrono::NaiveDate;
use rise_types::ui::DatePickerState;
use rise_types::{FieldKey, FieldValue, FieldValues};

#[derive(Debug, Default)]
pub struct ModalCoordinator {
    picker: DatePickerState,
}

impl ModalCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn picker(&self) -> &DatePickerState {
        &self.picker
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    pub fn open(&mut self, owner: FieldKey, initial: NaiveDate, minimum: Option<NaiveDate>) {
        tracing::debug!(field = %owner, %initial, "Opening date picker");
        self.picker.open(owner, initial, minimum);
    }

    /// Commit `value` into the owner's field. Returns the owner on success.
    ///
    /// Dates before the picker's minimum are refused and leave the picker open.
    pub fn commit(&mut self, value: NaiveDate, values: &mut FieldValues) -> Option<FieldKey> {
        if self.picker.minimum().is_some_and(|min| value < min) {
            tracing::debug!(%value, "Picker commit below minimum");
            return None;
        }
        let (owner, date) = self.picker.commit(value)?;
        values.set(owner, FieldValue::Date(date));
        Some(owner)
    }

    /// Dismiss without committing.
    pub fn close(&mut self) {
        self.picker.close();
    }

    /// Close before an index change. Returns whether the picker was open.
    pub fn force_close(&mut self) -> bool {
        let was_open = self.picker.is_open();
        if was_open {
            tracing::debug!(owner = ?self.picker.owner(), "Force-closing date picker");
            self.picker.close();
        }
        was_open
    }
}
