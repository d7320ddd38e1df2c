//! Goal plan creation: name, amount, maturity date, then a projection.

use rise_providers::MutationRequest;
use rise_types::{
    CurrencyInput, DateRule, FieldKey, FieldValues, MinimumHorizon, NonEmptyString, PlanDraft, PlanProjection,
    StepDescriptor, StepKind, StepSequence, StepSequenceError,
};
use serde_json::json;

use crate::collaborators::Screen;
use crate::flow::{FlowDefinition, FlowError, Prepared};

pub const PROJECTION_PATH: &str = "/plans/projection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalPlanFlow {
    horizon: MinimumHorizon,
}

impl Default for GoalPlanFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalPlanFlow {
    /// Any date from tomorrow on is an acceptable target.
    #[must_use]
    pub fn new() -> Self {
        Self::with_horizon(MinimumHorizon::NextDay)
    }

    #[must_use]
    pub fn with_horizon(horizon: MinimumHorizon) -> Self {
        Self { horizon }
    }

    #[must_use]
    pub fn horizon(&self) -> MinimumHorizon {
        self.horizon
    }
}

impl FlowDefinition for GoalPlanFlow {
    type Output = PlanProjection;
    type Draft = PlanDraft;

    fn name(&self) -> &'static str {
        "goal_plan"
    }

    fn steps(&self) -> Result<StepSequence, StepSequenceError> {
        StepSequence::new(vec![
            StepDescriptor::new(
                FieldKey::PlanName,
                "Goal name",
                "What are you saving for?",
                StepKind::Text,
            ),
            StepDescriptor::new(
                FieldKey::TargetAmount,
                "Target amount",
                "How much do you need?",
                StepKind::Currency,
            ),
            StepDescriptor::new(
                FieldKey::TargetDate,
                "Target date",
                "When do you want to withdraw?",
                StepKind::Date(DateRule::Future(self.horizon)),
            ),
        ])
    }

    fn failure_title(&self) -> &'static str {
        "Plan Error"
    }

    fn prepare(&self, values: &FieldValues) -> Result<Prepared<PlanDraft>, FlowError> {
        let name = values
            .text(FieldKey::PlanName)
            .and_then(|text| NonEmptyString::new(text.trim()).ok())
            .ok_or(FlowError::MissingField(FieldKey::PlanName))?;
        let amount = values
            .currency(FieldKey::TargetAmount)
            .and_then(CurrencyInput::amount)
            .map(|amount| amount.normalize().to_string())
            .ok_or(FlowError::MissingField(FieldKey::TargetAmount))?;
        let maturity_date = values
            .date(FieldKey::TargetDate)
            .ok_or(FlowError::MissingField(FieldKey::TargetDate))?;

        let request = MutationRequest::get(
            PROJECTION_PATH,
            json!({
                "monthly_investment": amount,
                "maturity_date": maturity_date,
            }),
        );
        Ok(Prepared {
            request,
            draft: PlanDraft {
                name,
                amount,
                maturity_date,
            },
        })
    }

    fn success_screen(&self, draft: PlanDraft, output: &PlanProjection) -> Screen {
        Screen::PlanReview {
            draft,
            projection: output.clone(),
        }
    }
}
