//! Step descriptors - the closed set of step kinds a flow can contain.
//!
//! Each kind carries its own validation rule, so a flow is described as an
//! ordered list of descriptors and never branches on numeric step indices.
//! Invariants enforced at construction time: a sequence is non-empty and
//! every field key appears at most once.

use std::collections::HashSet;

use thiserror::Error;

use crate::FieldKey;

/// Earliest acceptable date for a future-dated step, relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimumHorizon {
    /// Tomorrow at the earliest.
    NextDay,
    /// `n` years and one day from today (long-horizon goals).
    Years(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// Strictly after today, and no earlier than the horizon.
    Future(MinimumHorizon),
    /// Strictly before today (e.g. date of birth).
    Past,
}

/// The input surface a host renders for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Phone,
    Currency,
    Date,
    /// Nothing to enter; the step only confirms.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Required free text: valid iff the trimmed value is non-empty.
    Text,
    /// Free text that may be left blank.
    OptionalText,
    /// Phone number: 7-15 digits once separators are removed.
    Phone,
    /// Positive amount after locale formatting is stripped.
    Currency,
    /// Date committed through the picker, checked against a rule.
    Date(DateRule),
    /// Confirmation-only step (plan review).
    Review,
}

impl StepKind {
    #[must_use]
    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Text | Self::OptionalText => InputKind::Text,
            Self::Phone => InputKind::Phone,
            Self::Currency => InputKind::Currency,
            Self::Date(_) => InputKind::Date,
            Self::Review => InputKind::None,
        }
    }

    #[must_use]
    pub const fn date_rule(self) -> Option<DateRule> {
        match self {
            Self::Date(rule) => Some(rule),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    key: FieldKey,
    title: &'static str,
    prompt: &'static str,
    kind: StepKind,
}

impl StepDescriptor {
    #[must_use]
    pub const fn new(
        key: FieldKey,
        title: &'static str,
        prompt: &'static str,
        kind: StepKind,
    ) -> Self {
        Self {
            key,
            title,
            prompt,
            kind,
        }
    }

    #[must_use]
    pub const fn key(&self) -> FieldKey {
        self.key
    }

    /// Short title shown in the navigation bar.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        self.prompt
    }

    #[must_use]
    pub const fn kind(&self) -> StepKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepSequenceError {
    #[error("a flow needs at least one step")]
    Empty,
    #[error("field {0} is owned by more than one step")]
    DuplicateKey(FieldKey),
}

/// An immutable, non-empty, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequence {
    steps: Vec<StepDescriptor>,
}

impl StepSequence {
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, StepSequenceError> {
        if steps.is_empty() {
            return Err(StepSequenceError::Empty);
        }
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.key) {
                return Err(StepSequenceError::DuplicateKey(step.key));
            }
        }
        Ok(Self { steps })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn position(&self, key: FieldKey) -> Option<usize> {
        self.steps.iter().position(|step| step.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[StepDescriptor] {
        &self.steps
    }
}
