use std::fmt;

/// Strongly-typed identifier for a step's field value.
///
/// Every step in every flow owns exactly one key; field values are stored
/// against these keys rather than against positional indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    PlanName,
    TargetAmount,
    TargetDate,
    PlanReview,
    FirstName,
    LastName,
    Nickname,
    PhoneNumber,
    DateOfBirth,
}

impl FieldKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlanName => "plan_name",
            Self::TargetAmount => "target_amount",
            Self::TargetDate => "target_date",
            Self::PlanReview => "plan_review",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Nickname => "nickname",
            Self::PhoneNumber => "phone_number",
            Self::DateOfBirth => "date_of_birth",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
