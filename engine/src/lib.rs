//! Core engine for Rise flows: step sequencing and submission orchestration.
//!
//! This crate contains the flow state machines without any rendering. A host
//! screen owns one [`FlowController`] per flow instance, forwards user intents
//! to it (`set_text`, `go_next`, `go_back`, picker calls, carousel snaps) and
//! renders whatever it reports.
//!
//! # Components
//!
//! - [`StepSequencer`] - authoritative step index and navigation legality.
//! - [`SubmissionMachine`] - the single in-flight network submission,
//!   guarded against re-entry and stale resolutions.
//! - [`ModalCoordinator`] - the auxiliary date picker.
//! - [`FlowController`] - wires the three together with the collaborators in
//!   [`FlowServices`].
//!
//! Validation rules live in [`rise_types::validation`] so that the picker
//! minimum and the step gate are computed by the same code.

mod clock;
mod collaborators;
mod flow;
pub mod flows;
mod modal;
mod notifications;
mod sequencer;
mod submission;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collaborators::{Navigator, Screen, SuccessPrompt};
pub use flow::{FlowController, FlowDefinition, FlowError, FlowEvent, FlowServices, Prepared};
pub use flows::{GoalPlanFlow, PlanReviewFlow, SignUpFlow};
pub use modal::ModalCoordinator;
pub use notifications::{Notifier, Toast, ToastKind, ToastQueue};
pub use sequencer::{BackOutcome, JumpOutcome, NextOutcome, Stage, StepSequencer};
pub use submission::{Applied, Resolution, SubmissionMachine, SubmitOutcome};

pub use rise_providers::{self, MutationError, MutationRequest, MutationService};
pub use rise_types::{self, FieldKey, FieldValues, SubmissionStatus};
