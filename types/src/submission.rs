/// Observable state of a flow's single network submission.
///
/// # State Machine
/// ```text
/// ┌──────┐ submit ┌─────────┐ resolve ok  ┌──────────────┐
/// │ Idle │ ─────> │ Pending │ ──────────> │ Succeeded(T) │
/// └──────┘        └─────────┘             └──────────────┘
///                   ^     │ resolve err
///          retry    │     v
///                 ┌───────────────┐
///                 │ Failed(msg)   │
///                 └───────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus<T> {
    #[default]
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> SubmissionStatus<T> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// `Idle` and `Failed` are the only states a submission may start from.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
