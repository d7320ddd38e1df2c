//! Outward-facing seams: where a flow goes when it ends.

use rise_types::{PlanDraft, PlanProjection};

/// Destinations a flow can hand off to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Review of a projected plan before it is created.
    PlanReview {
        draft: PlanDraft,
        projection: PlanProjection,
    },
    Success(SuccessPrompt),
    SignIn,
    Home,
}

/// Confirmation screen shown after a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPrompt {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button: &'static str,
    /// Where the button leads.
    pub next: Box<Screen>,
}

pub trait Navigator: Send + Sync {
    /// Dismiss the flow (back from the first step).
    fn exit(&self);
    fn navigate_to(&self, screen: Screen);
}
