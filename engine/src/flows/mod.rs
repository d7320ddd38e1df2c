//! The concrete flows of the app.

mod goal_plan;
mod plan_review;
mod sign_up;

pub use goal_plan::{GoalPlanFlow, PROJECTION_PATH};
pub use plan_review::{PLANS_PATH, PlanReviewFlow};
pub use sign_up::{SignUpFlow, USERS_PATH};
