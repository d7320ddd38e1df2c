//! The flow controller: one host screen's worth of multi-step state.
//!
//! A [`FlowController`] owns the step sequencer, the collected field values,
//! the date picker and the submission machine for a single flow instance.
//! Everything a concrete flow contributes (its steps, how values become a
//! request, where success leads) comes through [`FlowDefinition`].
//!
//! All methods are synchronous except [`FlowController::settle`]. Hosts
//! driving an event loop call [`FlowController::poll`] once per tick.

use std::future::Future;
use std::sync::Arc;

use rise_providers::{MutationError, MutationFut, MutationRequest, MutationService};
use rise_types::ui::DatePickerState;
use rise_types::validation::{is_step_valid, picker_minimum};
use rise_types::{
    CurrencyInput, FieldKey, FieldValue, FieldValues, InputKind, StepDescriptor, StepSequence,
    StepSequenceError, SubmissionStatus,
};
use serde::de::DeserializeOwned;

use crate::clock::Clock;
use crate::collaborators::{Navigator, Screen};
use crate::modal::ModalCoordinator;
use crate::notifications::{Notifier, Toast};
use crate::sequencer::{BackOutcome, JumpOutcome, NextOutcome, Stage, StepSequencer};
use crate::submission::{Applied, SubmissionMachine, SubmitOutcome};

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("no usable value for {0}")]
    MissingField(FieldKey),
    #[error(transparent)]
    Steps(#[from] StepSequenceError),
}

/// What a flow submits, plus whatever it needs to remember for the success
/// screen.
#[derive(Debug, Clone)]
pub struct Prepared<D> {
    pub request: MutationRequest,
    pub draft: D,
}

pub trait FlowDefinition {
    /// Decoded response body of a successful submission.
    type Output: DeserializeOwned + Send + 'static;
    /// Snapshot of the submitted values, handed back on success.
    type Draft;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
    fn steps(&self) -> Result<StepSequence, StepSequenceError>;
    /// Toast title used when a submission fails.
    fn failure_title(&self) -> &'static str;
    /// Build the request from values that have passed validation.
    fn prepare(&self, values: &FieldValues) -> Result<Prepared<Self::Draft>, FlowError>;
    fn success_screen(&self, draft: Self::Draft, output: &Self::Output) -> Screen;
}

/// The collaborators a flow talks to.
#[derive(Clone)]
pub struct FlowServices {
    pub mutations: Arc<dyn MutationService>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for FlowServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowServices").finish_non_exhaustive()
    }
}

/// Result of one user intent or one drained resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Moved(usize),
    /// Forward navigation refused: the current step is not valid.
    Blocked,
    /// Back from the first step; the navigator was told to exit.
    Exited,
    SubmissionStarted,
    /// A submission is already in flight; nothing happened.
    AlreadySubmitting,
    /// The view must snap back to this index.
    Pinned(usize),
    Unchanged,
    /// Submission succeeded and the navigator was given the next screen.
    Completed,
    /// Submission failed with this message and the user was notified.
    Failed(String),
    Ignored,
}

pub struct FlowController<F: FlowDefinition> {
    definition: F,
    sequencer: StepSequencer,
    values: FieldValues,
    modal: ModalCoordinator,
    submission: SubmissionMachine<F::Output>,
    pending_draft: Option<F::Draft>,
    services: FlowServices,
}

impl<F: FlowDefinition> std::fmt::Debug for FlowController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowController")
            .field("flow", &self.definition.name())
            .field("sequencer", &self.sequencer)
            .field("values", &self.values)
            .field("modal", &self.modal)
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

impl<F: FlowDefinition> FlowController<F> {
    pub fn new(definition: F, services: FlowServices) -> Result<Self, FlowError> {
        let steps = definition.steps()?;
        tracing::debug!(flow = definition.name(), steps = steps.len(), "Flow started");
        Ok(Self {
            definition,
            sequencer: StepSequencer::new(steps),
            values: FieldValues::new(),
            modal: ModalCoordinator::new(),
            submission: SubmissionMachine::new(),
            pending_draft: None,
            services,
        })
    }

    #[must_use]
    pub fn definition(&self) -> &F {
        &self.definition
    }

    #[must_use]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    #[must_use]
    pub fn steps(&self) -> &StepSequence {
        self.sequencer.steps()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    #[must_use]
    pub fn current_step(&self) -> &StepDescriptor {
        self.sequencer.current_step()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.sequencer.progress()
    }

    #[must_use]
    pub fn question_label(&self) -> String {
        self.sequencer.question_label()
    }

    #[must_use]
    pub fn nav_title(&self) -> &'static str {
        self.sequencer.nav_title()
    }

    #[must_use]
    pub fn picker(&self) -> &DatePickerState {
        self.modal.picker()
    }

    #[must_use]
    pub fn submission_status(&self) -> &SubmissionStatus<F::Output> {
        self.submission.status()
    }

    /// Whether the forward affordance should be enabled.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.sequencer.stage() == Stage::Editing
            && is_step_valid(
                self.sequencer.current_step(),
                &self.values,
                self.services.clock.today(),
            )
    }

    /// Store typed text for the current step. Date and review steps take no
    /// text; dates only arrive through the picker.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.sequencer.stage() != Stage::Editing {
            return false;
        }
        let step = self.sequencer.current_step();
        let value = match step.kind().input_kind() {
            InputKind::Text | InputKind::Phone => FieldValue::Text(text.into()),
            InputKind::Currency => FieldValue::Currency(CurrencyInput::new(text)),
            InputKind::Date | InputKind::None => return false,
        };
        self.values.set(step.key(), value);
        true
    }

    /// Open the picker for the current step, if it is a date step.
    pub fn open_date_picker(&mut self) -> bool {
        if self.sequencer.stage() != Stage::Editing {
            return false;
        }
        let step = self.sequencer.current_step();
        let Some(rule) = step.kind().date_rule() else {
            return false;
        };
        let today = self.services.clock.today();
        let minimum = picker_minimum(rule, today);
        let initial = self
            .values
            .date(step.key())
            .or(minimum)
            .unwrap_or(today);
        self.modal.open(step.key(), initial, minimum);
        true
    }

    pub fn commit_date(&mut self, date: chrono::NaiveDate) -> bool {
        self.modal.commit(date, &mut self.values).is_some()
    }

    pub fn close_date_picker(&mut self) {
        self.modal.close();
    }

    pub fn go_next(&mut self) -> FlowEvent {
        if self.submission.status().is_pending() {
            return FlowEvent::AlreadySubmitting;
        }
        let today = self.services.clock.today();
        match self.sequencer.go_next(&self.values, today) {
            NextOutcome::Blocked => FlowEvent::Blocked,
            NextOutcome::MovedTo(index) => self.moved(index),
            NextOutcome::Revisit(index) => {
                tracing::debug!(flow = self.definition.name(), index, "Revisiting invalid step");
                self.moved(index)
            }
            NextOutcome::Submit => self.start_submission(),
            NextOutcome::Ignored => FlowEvent::Ignored,
        }
    }

    pub fn go_back(&mut self) -> FlowEvent {
        if self.submission.cancel() {
            tracing::info!(flow = self.definition.name(), "Submission abandoned on back");
            self.pending_draft = None;
        }
        match self.sequencer.go_back() {
            BackOutcome::Exit => {
                self.modal.force_close();
                tracing::debug!(flow = self.definition.name(), "Exiting flow");
                self.services.navigator.exit();
                FlowEvent::Exited
            }
            BackOutcome::MovedTo(index) => self.moved(index),
            BackOutcome::Ignored => FlowEvent::Ignored,
        }
    }

    /// Reconcile with the index the positional view settled on.
    pub fn on_carousel_snap(&mut self, index: usize) -> FlowEvent {
        match self.sequencer.jump_to(index) {
            JumpOutcome::Reconciled(index) => self.moved(index),
            JumpOutcome::Unchanged => FlowEvent::Unchanged,
            JumpOutcome::Pinned(index) => FlowEvent::Pinned(index),
            JumpOutcome::OutOfRange => {
                tracing::debug!(flow = self.definition.name(), index, "Carousel index out of range");
                FlowEvent::Ignored
            }
        }
    }

    /// Apply a finished submission if one is waiting. Never blocks.
    pub fn poll(&mut self) -> Option<FlowEvent> {
        let applied = self.submission.poll()?;
        Some(self.finish(applied))
    }

    /// Wait for the in-flight submission. `None` when nothing is pending.
    pub async fn settle(&mut self) -> Option<FlowEvent> {
        let applied = self.submission.settle().await?;
        Some(self.finish(applied))
    }

    /// Abandon the flow: abort any submission and close the picker.
    pub fn teardown(&mut self) {
        if self.submission.cancel() {
            tracing::debug!(flow = self.definition.name(), "Submission abandoned on teardown");
        }
        self.pending_draft = None;
        self.modal.force_close();
    }

    fn moved(&mut self, index: usize) -> FlowEvent {
        self.modal.force_close();
        tracing::debug!(
            flow = self.definition.name(),
            index,
            step = %self.sequencer.current_step().key(),
            "Step changed"
        );
        FlowEvent::Moved(index)
    }

    fn start_submission(&mut self) -> FlowEvent {
        self.modal.force_close();
        let prepared = match self.definition.prepare(&self.values) {
            Ok(prepared) => prepared,
            Err(err) => {
                let message = err.to_string();
                tracing::error!(flow = self.definition.name(), error = %message, "Could not build request");
                self.sequencer.resume();
                self.services
                    .notifier
                    .notify(Toast::error(self.definition.failure_title(), message.clone()));
                return FlowEvent::Failed(message);
            }
        };

        let Prepared { request, draft } = prepared;
        tracing::info!(
            flow = self.definition.name(),
            method = request.method.as_str(),
            path = %request.path,
            "Submitting"
        );
        let service = Arc::clone(&self.services.mutations);
        let outcome = self
            .submission
            .submit(move || decode_response::<F::Output>(service.mutate(request)));

        match outcome {
            SubmitOutcome::Started { .. } => {
                self.pending_draft = Some(draft);
                FlowEvent::SubmissionStarted
            }
            SubmitOutcome::AlreadyPending => FlowEvent::AlreadySubmitting,
        }
    }

    fn finish(&mut self, applied: Applied) -> FlowEvent {
        match applied {
            Applied::Succeeded => {
                self.sequencer.complete();
                let draft = self.pending_draft.take();
                match (draft, self.submission.status().result()) {
                    (Some(draft), Some(output)) => {
                        tracing::info!(flow = self.definition.name(), "Submission succeeded");
                        let screen = self.definition.success_screen(draft, output);
                        self.services.navigator.navigate_to(screen);
                    }
                    _ => {
                        tracing::error!(flow = self.definition.name(), "Succeeded without a draft");
                    }
                }
                FlowEvent::Completed
            }
            Applied::Failed(message) => {
                self.pending_draft = None;
                self.sequencer.resume();
                self.services
                    .notifier
                    .notify(Toast::error(self.definition.failure_title(), message.clone()));
                FlowEvent::Failed(message)
            }
            Applied::Stale => FlowEvent::Ignored,
        }
    }
}

fn decode_response<T: DeserializeOwned + Send + 'static>(
    response: MutationFut,
) -> impl Future<Output = Result<T, MutationError>> + Send + 'static {
    async move {
        let body = response.await?;
        serde_json::from_value(body).map_err(|err| MutationError::Decode(err.to_string()))
    }
}
