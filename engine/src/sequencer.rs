//! Step sequencing: which step is current, and what each navigation intent does.
//!
//! ```text
//!             go_next (valid, last)          succeeded
//!   Editing ─────────────────────────▶ Submitting ─────────▶ Completed
//!      ▲                                   │
//!      └─────── failed / go_back ──────────┘
//! ```
//!
//! The sequencer never performs side effects. It reports an outcome and the
//! flow controller acts on it (exit, submit, notify).

use chrono::NaiveDate;
use rise_types::validation::is_step_valid;
use rise_types::{FieldValues, StepDescriptor, StepSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Editing,
    /// The last step was confirmed and a submission is in flight.
    Submitting,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Already on the first step; the flow should be dismissed.
    Exit,
    MovedTo(usize),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// The current step is not valid.
    Blocked,
    MovedTo(usize),
    /// The last step was confirmed but an earlier step is no longer valid.
    /// The sequencer has moved back to it.
    Revisit(usize),
    /// The last step was confirmed with every step valid.
    Submit,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    Reconciled(usize),
    Unchanged,
    /// Index changes are refused while submitting; the view must return here.
    Pinned(usize),
    OutOfRange,
}

#[derive(Debug, Clone)]
pub struct StepSequencer {
    steps: StepSequence,
    current: usize,
    stage: Stage,
}

impl StepSequencer {
    #[must_use]
    pub fn new(steps: StepSequence) -> Self {
        Self {
            steps,
            current: 0,
            stage: Stage::Editing,
        }
    }

    #[must_use]
    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> &StepDescriptor {
        // `current` is kept in 0..len and the sequence is never empty.
        &self.steps.as_slice()[self.current]
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current == self.steps.last_index()
    }

    pub fn go_back(&mut self) -> BackOutcome {
        match self.stage {
            Stage::Completed => return BackOutcome::Ignored,
            Stage::Submitting => self.stage = Stage::Editing,
            Stage::Editing => {}
        }
        if self.current == 0 {
            return BackOutcome::Exit;
        }
        self.current -= 1;
        BackOutcome::MovedTo(self.current)
    }

    pub fn go_next(&mut self, values: &FieldValues, today: NaiveDate) -> NextOutcome {
        if self.stage != Stage::Editing {
            return NextOutcome::Ignored;
        }
        if !is_step_valid(self.current_step(), values, today) {
            return NextOutcome::Blocked;
        }
        if !self.is_last() {
            self.current += 1;
            return NextOutcome::MovedTo(self.current);
        }
        if let Some(index) = self
            .steps
            .iter()
            .position(|step| !is_step_valid(step, values, today))
        {
            self.current = index;
            return NextOutcome::Revisit(index);
        }
        self.stage = Stage::Submitting;
        NextOutcome::Submit
    }

    /// Reconcile with the index a carousel settled on.
    pub fn jump_to(&mut self, index: usize) -> JumpOutcome {
        if self.stage != Stage::Editing {
            return JumpOutcome::Pinned(self.current);
        }
        if index >= self.steps.len() {
            return JumpOutcome::OutOfRange;
        }
        if index == self.current {
            return JumpOutcome::Unchanged;
        }
        self.current = index;
        JumpOutcome::Reconciled(index)
    }

    /// A submission failed or was cancelled; editing resumes on the last step.
    pub fn resume(&mut self) {
        if self.stage == Stage::Submitting {
            self.stage = Stage::Editing;
        }
    }

    pub fn complete(&mut self) {
        self.stage = Stage::Completed;
    }

    /// Fraction of the flow reached, in `(0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // step counts are tiny
    pub fn progress(&self) -> f32 {
        if self.stage == Stage::Completed {
            return 1.0;
        }
        (self.current + 1) as f32 / self.steps.len() as f32
    }

    /// e.g. "Question 2 of 3"
    #[must_use]
    pub fn question_label(&self) -> String {
        format!("Question {} of {}", self.current + 1, self.steps.len())
    }

    #[must_use]
    pub fn nav_title(&self) -> &'static str {
        self.current_step().title()
    }
}
