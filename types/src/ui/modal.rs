//! Date picker modal state.

use chrono::NaiveDate;

use crate::FieldKey;

/// Label shown on a date field before anything has been committed.
pub const PICKER_PLACEHOLDER: &str = "Choose date";

/// State of the auxiliary date picker.
///
/// The picker belongs to whichever step opened it. Closing without a commit
/// never touches the committed value, so cancelling a picker interaction
/// cannot erase a date chosen earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatePickerState {
    is_open: bool,
    owner: Option<FieldKey>,
    initial: Option<NaiveDate>,
    committed: Option<NaiveDate>,
    minimum: Option<NaiveDate>,
}

impl DatePickerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the picker for `owner`, positioned at `initial`.
    ///
    /// Switching owners drops the previous owner's committed value from the
    /// picker (the step's field value is unaffected).
    pub fn open(&mut self, owner: FieldKey, initial: NaiveDate, minimum: Option<NaiveDate>) {
        if self.owner != Some(owner) {
            self.committed = None;
        }
        self.owner = Some(owner);
        self.initial = Some(initial);
        self.minimum = minimum;
        self.is_open = true;
    }

    /// Record `value` and close. Returns the owning field and the value, or
    /// `None` when the picker was not open.
    pub fn commit(&mut self, value: NaiveDate) -> Option<(FieldKey, NaiveDate)> {
        if !self.is_open {
            return None;
        }
        let owner = self.owner?;
        self.committed = Some(value);
        self.is_open = false;
        Some((owner, value))
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn owner(&self) -> Option<FieldKey> {
        self.owner
    }

    #[must_use]
    pub fn initial(&self) -> Option<NaiveDate> {
        self.initial
    }

    #[must_use]
    pub fn committed(&self) -> Option<NaiveDate> {
        self.committed
    }

    #[must_use]
    pub fn minimum(&self) -> Option<NaiveDate> {
        self.minimum
    }

    /// `DD-MM-YYYY` once a value is committed, otherwise the placeholder.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.committed.map_or_else(
            || PICKER_PLACEHOLDER.to_string(),
            |date| date.format("%d-%m-%Y").to_string(),
        )
    }
}
