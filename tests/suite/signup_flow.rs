//! Sign-up details flow against a mock Rise API.

use chrono::NaiveDate;
use rise_engine::rise_types::Credentials;
use rise_engine::{FlowController, FlowEvent, Screen, SignUpFlow};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{Harness, client_for, harness, mount_json, start_rise_mock};

fn filled_flow(harness: &Harness, nickname: &str) -> FlowController<SignUpFlow> {
    let credentials = Credentials {
        email: "deborah@example.com".into(),
        password: "hunter2".into(),
    };
    let mut flow = FlowController::new(SignUpFlow::new(credentials), harness.services.clone())
        .unwrap();
    flow.set_text("Deborah");
    assert_eq!(flow.go_next(), FlowEvent::Moved(1));
    flow.set_text("Okafor");
    assert_eq!(flow.go_next(), FlowEvent::Moved(2));
    if !nickname.is_empty() {
        flow.set_text(nickname);
    }
    assert_eq!(flow.go_next(), FlowEvent::Moved(3));
    flow.set_text("+234 801 234 5678");
    assert_eq!(flow.go_next(), FlowEvent::Moved(4));
    assert!(flow.open_date_picker());
    assert!(flow.commit_date(NaiveDate::from_ymd_opt(1994, 3, 12).unwrap()));
    flow
}

#[tokio::test]
async fn sign_up_posts_details_and_prompts_sign_in() {
    let server = start_rise_mock().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({
            "first_name": "Deborah",
            "last_name": "Okafor",
            "email_address": "deborah@example.com",
            "username": "",
            "password": "hunter2",
            "date_of_birth": "1994-03-12",
            "phone_number": "+234 801 234 5678",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "user-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = filled_flow(&harness, "");

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));

    let screens = harness.navigator.screens();
    assert_eq!(screens.len(), 1);
    let Screen::Success(prompt) = &screens[0] else {
        panic!("expected success prompt, got {:?}", screens[0]);
    };
    assert_eq!(prompt.title, "You just created your Rise account");
    assert_eq!(*prompt.next, Screen::SignIn);
}

#[tokio::test]
async fn rejected_sign_up_keeps_the_user_on_the_last_step() {
    let server = start_rise_mock().await;
    mount_json(
        &server,
        "POST",
        "/users",
        422,
        json!({"message": "Email already exists"}),
    )
    .await;

    let harness = harness(client_for(&server));
    let mut flow = filled_flow(&harness, "debby");

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(
        flow.settle().await,
        Some(FlowEvent::Failed("Email already exists".into()))
    );
    assert_eq!(flow.current_index(), 4);
    let toasts = harness.toasts.take();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Sign Up Error");
    assert!(harness.navigator.screens().is_empty());
}

#[tokio::test]
async fn back_from_first_step_leaves_without_a_request() {
    let server = start_rise_mock().await;
    let harness = harness(client_for(&server));
    let credentials = Credentials {
        email: "deborah@example.com".into(),
        password: "hunter2".into(),
    };
    let mut flow =
        FlowController::new(SignUpFlow::new(credentials), harness.services.clone()).unwrap();

    assert_eq!(flow.go_back(), FlowEvent::Exited);
    assert_eq!(harness.navigator.exits(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}
