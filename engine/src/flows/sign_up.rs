//! Account sign-up details, after email and password were collected.

use rise_providers::MutationRequest;
use rise_types::{
    Credentials, DateRule, FieldKey, FieldValues, StepDescriptor, StepKind, StepSequence,
    StepSequenceError,
};
use serde_json::{Value, json};

use crate::collaborators::{Screen, SuccessPrompt};
use crate::flow::{FlowDefinition, FlowError, Prepared};

pub const USERS_PATH: &str = "/users";

#[derive(Debug, Clone)]
pub struct SignUpFlow {
    credentials: Credentials,
}

impl SignUpFlow {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    fn required(values: &FieldValues, key: FieldKey) -> Result<String, FlowError> {
        values
            .text(key)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string)
            .ok_or(FlowError::MissingField(key))
    }
}

impl FlowDefinition for SignUpFlow {
    type Output = Value;
    type Draft = ();

    fn name(&self) -> &'static str {
        "sign_up"
    }

    fn steps(&self) -> Result<StepSequence, StepSequenceError> {
        StepSequence::new(vec![
            StepDescriptor::new(
                FieldKey::FirstName,
                "First name",
                "Legal first name",
                StepKind::Text,
            ),
            StepDescriptor::new(
                FieldKey::LastName,
                "Last name",
                "Legal last name",
                StepKind::Text,
            ),
            StepDescriptor::new(
                FieldKey::Nickname,
                "Nickname",
                "What should we call you?",
                StepKind::OptionalText,
            ),
            StepDescriptor::new(
                FieldKey::PhoneNumber,
                "Phone number",
                "Your phone number",
                StepKind::Phone,
            ),
            StepDescriptor::new(
                FieldKey::DateOfBirth,
                "Date of birth",
                "When were you born?",
                StepKind::Date(DateRule::Past),
            ),
        ])
    }

    fn failure_title(&self) -> &'static str {
        "Sign Up Error"
    }

    fn prepare(&self, values: &FieldValues) -> Result<Prepared<()>, FlowError> {
        let first_name = Self::required(values, FieldKey::FirstName)?;
        let last_name = Self::required(values, FieldKey::LastName)?;
        let phone_number = Self::required(values, FieldKey::PhoneNumber)?;
        let username = values
            .text(FieldKey::Nickname)
            .map(str::trim)
            .unwrap_or_default();
        let date_of_birth = values
            .date(FieldKey::DateOfBirth)
            .ok_or(FlowError::MissingField(FieldKey::DateOfBirth))?;

        let request = MutationRequest::post(
            USERS_PATH,
            json!({
                "first_name": first_name,
                "last_name": last_name,
                "email_address": self.credentials.email,
                "username": username,
                "password": self.credentials.password,
                "date_of_birth": date_of_birth,
                "phone_number": phone_number,
            }),
        );
        Ok(Prepared { request, draft: () })
    }

    fn success_screen(&self, (): (), _output: &Value) -> Screen {
        Screen::Success(SuccessPrompt {
            title: "You just created your Rise account",
            subtitle: "Welcome to Rise, let's take you home",
            button: "Okay",
            next: Box::new(Screen::SignIn),
        })
    }
}
