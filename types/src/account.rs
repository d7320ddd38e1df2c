//! Account-level read models and sign-up credentials.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balances shown on the home screen (`GET /sessions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSession {
    #[serde(default)]
    pub total_balance: Decimal,
    #[serde(default)]
    pub total_returns: Decimal,
}

/// One entry of `GET /plans`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: String,
    pub plan_name: String,
    #[serde(default)]
    pub invested_amount: Decimal,
    #[serde(default)]
    pub total_returns: Decimal,
    #[serde(default)]
    pub target_amount: Decimal,
    pub maturity_date: String,
}

/// Email and password captured before the sign-up details flow.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Manual Debug impl to prevent leaking passwords in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
