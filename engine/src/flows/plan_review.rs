//! Plan review: confirm a projected plan and create it.

use chrono::NaiveDate;
use rise_providers::MutationRequest;
use rise_types::{
    FieldKey, FieldValues, PlanDraft, PlanProjection, ReviewSummary, StepDescriptor, StepKind,
    StepSequence, StepSequenceError,
};
use serde_json::{Value, json};

use crate::collaborators::{Screen, SuccessPrompt};
use crate::flow::{FlowDefinition, FlowError, Prepared};

pub const PLANS_PATH: &str = "/plans";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReviewFlow {
    draft: PlanDraft,
    projection: PlanProjection,
}

impl PlanReviewFlow {
    #[must_use]
    pub fn new(draft: PlanDraft, projection: PlanProjection) -> Self {
        Self { draft, projection }
    }

    #[must_use]
    pub fn draft(&self) -> &PlanDraft {
        &self.draft
    }

    #[must_use]
    pub fn projection(&self) -> &PlanProjection {
        &self.projection
    }

    #[must_use]
    pub fn summary(&self, today: NaiveDate) -> ReviewSummary {
        ReviewSummary::compute(&self.draft, &self.projection, today)
    }
}

impl FlowDefinition for PlanReviewFlow {
    type Output = Value;
    type Draft = ();

    fn name(&self) -> &'static str {
        "plan_review"
    }

    fn steps(&self) -> Result<StepSequence, StepSequenceError> {
        StepSequence::new(vec![StepDescriptor::new(
            FieldKey::PlanReview,
            "Review",
            "Review your plan",
            StepKind::Review,
        )])
    }

    fn failure_title(&self) -> &'static str {
        "Plan Error"
    }

    fn prepare(&self, _values: &FieldValues) -> Result<Prepared<()>, FlowError> {
        let request = MutationRequest::post(
            PLANS_PATH,
            json!({
                "plan_name": self.draft.name.as_str(),
                "target_amount": self.draft.amount,
                "maturity_date": self.draft.maturity_date,
            }),
        );
        Ok(Prepared { request, draft: () })
    }

    fn success_screen(&self, (): (), _output: &Value) -> Screen {
        Screen::Success(SuccessPrompt {
            title: "You just created your plan.",
            subtitle: "Well done",
            button: "View plan",
            next: Box::new(Screen::Home),
        })
    }
}
