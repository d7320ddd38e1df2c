//! Plan review flow against a mock Rise API.

use chrono::NaiveDate;
use rise_engine::rise_types::{NonEmptyString, PlanDraft, PlanProjection};
use rise_engine::{FlowController, FlowEvent, PlanReviewFlow, Screen, Stage};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{client_for, harness, mount_json, start_rise_mock, today};

fn review() -> PlanReviewFlow {
    PlanReviewFlow::new(
        PlanDraft {
            name: NonEmptyString::new("Car Fund").unwrap(),
            amount: "500".into(),
            maturity_date: NaiveDate::from_ymd_opt(2027, 4, 20).unwrap(),
        },
        PlanProjection {
            total_returns: Decimal::from(600),
            total_invested: Decimal::from(3000),
        },
    )
}

#[tokio::test]
async fn confirming_creates_the_plan() {
    let server = start_rise_mock().await;
    Mock::given(method("POST"))
        .and(path("/plans"))
        .and(header_exists("idempotency-key"))
        .and(body_json(json!({
            "plan_name": "Car Fund",
            "target_amount": "500",
            "maturity_date": "2027-04-20",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "plan-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = FlowController::new(review(), harness.services.clone()).unwrap();
    assert!((flow.progress() - 1.0).abs() < f32::EPSILON);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));
    assert_eq!(flow.stage(), Stage::Completed);

    let screens = harness.navigator.screens();
    assert_eq!(screens.len(), 1);
    let Screen::Success(prompt) = &screens[0] else {
        panic!("expected success prompt, got {:?}", screens[0]);
    };
    assert_eq!(prompt.title, "You just created your plan.");
    assert_eq!(prompt.button, "View plan");
    assert_eq!(*prompt.next, Screen::Home);
}

#[tokio::test]
async fn nested_error_message_reaches_the_toast() {
    let server = start_rise_mock().await;
    mount_json(
        &server,
        "POST",
        "/plans",
        422,
        json!({"errors": [{"message": "Plan name already used"}]}),
    )
    .await;

    let harness = harness(client_for(&server));
    let mut flow = FlowController::new(review(), harness.services.clone()).unwrap();

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(
        flow.settle().await,
        Some(FlowEvent::Failed("Plan name already used".into()))
    );
    assert_eq!(flow.stage(), Stage::Editing);
    let toasts = harness.toasts.take();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].format(), "✗ Plan Error: Plan name already used");
}

#[tokio::test]
async fn unreadable_error_body_falls_back_to_status() {
    let server = start_rise_mock().await;
    Mock::given(method("POST"))
        .and(path("/plans"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = FlowController::new(review(), harness.services.clone()).unwrap();

    flow.go_next();
    let Some(FlowEvent::Failed(message)) = flow.settle().await else {
        panic!("expected failure");
    };
    assert!(message.starts_with("request failed with status 500"), "{message}");
}

#[test]
fn summary_spreads_returns_over_whole_months() {
    let summary = review().summary(today());
    assert_eq!(summary.months, 6);
    assert_eq!(summary.total_returns, Decimal::from(600));
    assert_eq!(summary.monthly_returns, Decimal::from(100));
    assert_eq!(summary.monthly_investment, Decimal::from(500));
    assert_eq!(summary.maturity_label, "20 April 2027");
}
