//! Investment plan models: the draft a goal flow produces, the projection
//! the API returns for it, and the figures the review step shows.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

/// A plan as entered by the user, ready for projection or creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDraft {
    pub name: NonEmptyString,
    /// Parsed amount without currency symbols or grouping, e.g. `1500`.
    pub amount: String,
    pub maturity_date: NaiveDate,
}

/// Projection returned by `/plans/projection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProjection {
    pub total_returns: Decimal,
    #[serde(default)]
    pub total_invested: Decimal,
}

/// Derived figures for the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub plan_name: String,
    pub total_returns: Decimal,
    pub maturity_label: String,
    /// Whole months until maturity, never less than one.
    pub months: u32,
    pub monthly_returns: Decimal,
    pub monthly_investment: Decimal,
}

impl ReviewSummary {
    #[must_use]
    pub fn compute(draft: &PlanDraft, projection: &PlanProjection, today: NaiveDate) -> Self {
        let months = whole_months_between(today, draft.maturity_date).max(1);
        let divisor = Decimal::from(months);
        Self {
            plan_name: draft.name.to_string(),
            total_returns: projection.total_returns.round_dp(2),
            maturity_label: draft.maturity_date.format("%-d %B %Y").to_string(),
            months,
            monthly_returns: (projection.total_returns / divisor).round_dp(2),
            monthly_investment: (projection.total_invested / divisor).round_dp(2),
        }
    }
}

/// Calendar-month distance from `from` to `to`, ignoring the day of month.
/// Zero when `to` is in the same month or earlier.
#[must_use]
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let diff = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    u32::try_from(diff.max(0)).unwrap_or(u32::MAX)
}
