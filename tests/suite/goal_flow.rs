//! Goal plan flow against a mock Rise API.

use std::time::Duration;

use rise_engine::{FlowController, FlowEvent, GoalPlanFlow, Screen, Stage, ToastKind};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    Harness, TEST_TOKEN, client_for, client_with_timeout, days_out, harness, start_rise_mock,
};

fn flow_on_last_step(harness: &Harness) -> FlowController<GoalPlanFlow> {
    let mut flow = FlowController::new(GoalPlanFlow::new(), harness.services.clone()).unwrap();
    assert!(flow.set_text("Car Fund"));
    assert_eq!(flow.go_next(), FlowEvent::Moved(1));
    assert!(flow.set_text("500"));
    assert_eq!(flow.go_next(), FlowEvent::Moved(2));
    assert!(flow.open_date_picker());
    assert!(flow.commit_date(days_out(30)));
    flow
}

#[tokio::test]
async fn projection_success_navigates_to_review_once() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .and(query_param("monthly_investment", "500"))
        .and(query_param("maturity_date", "2026-11-15"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_returns": 600, "total_invested": 3000})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = flow_on_last_step(&harness);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));
    assert_eq!(flow.stage(), Stage::Completed);
    assert!(flow.poll().is_none());

    let screens = harness.navigator.screens();
    assert_eq!(screens.len(), 1);
    let Screen::PlanReview { draft, projection } = &screens[0] else {
        panic!("expected plan review, got {:?}", screens[0]);
    };
    assert_eq!(draft.name.as_str(), "Car Fund");
    assert_eq!(draft.amount, "500");
    assert_eq!(draft.maturity_date, days_out(30));
    assert_eq!(projection.total_returns, Decimal::from(600));
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn api_error_shows_one_toast_and_retry_succeeds() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .respond_with(ResponseTemplate::new(504).set_body_json(json!({"message": "timeout"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_returns": 600})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = flow_on_last_step(&harness);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Failed("timeout".into())));
    assert_eq!(flow.current_index(), 2);
    assert_eq!(flow.stage(), Stage::Editing);
    assert!(harness.navigator.screens().is_empty());

    let toasts = harness.toasts.take();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].title, "Plan Error");
    assert_eq!(toasts[0].message, "timeout");

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));
    assert_eq!(harness.navigator.screens().len(), 1);
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn slow_server_times_out_as_failure() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_returns": 600}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let harness = harness(client_with_timeout(&server, Duration::from_millis(200)));
    let mut flow = flow_on_last_step(&harness);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Failed("timeout".into())));
    assert_eq!(harness.toasts.len(), 1);
    assert!(harness.navigator.screens().is_empty());
}

#[tokio::test]
async fn repeated_next_sends_one_request() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_returns": 600}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = flow_on_last_step(&harness);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.go_next(), FlowEvent::AlreadySubmitting);
    assert_eq!(flow.go_next(), FlowEvent::AlreadySubmitting);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));
    assert_eq!(harness.navigator.screens().len(), 1);
}

#[tokio::test]
async fn back_while_pending_drops_the_late_response() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_returns": 600}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = flow_on_last_step(&harness);

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.go_back(), FlowEvent::Moved(1));
    assert!(flow.submission_status().can_submit());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(flow.poll().is_none());
    assert!(flow.settle().await.is_none());
    assert!(harness.navigator.screens().is_empty());
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn formatted_amount_reaches_the_api_as_a_plain_number() {
    let server = start_rise_mock().await;
    Mock::given(method("GET"))
        .and(path("/plans/projection"))
        .and(query_param("monthly_investment", "1500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_returns": 600})))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(client_for(&server));
    let mut flow = FlowController::new(GoalPlanFlow::new(), harness.services.clone()).unwrap();
    flow.set_text("Car Fund");
    flow.go_next();
    assert!(flow.set_text("₦ 1,500"));
    assert_eq!(flow.go_next(), FlowEvent::Moved(2));
    assert!(flow.open_date_picker());
    assert!(flow.commit_date(days_out(30)));

    assert_eq!(flow.go_next(), FlowEvent::SubmissionStarted);
    assert_eq!(flow.settle().await, Some(FlowEvent::Completed));
    let screens = harness.navigator.screens();
    let Screen::PlanReview { draft, .. } = &screens[0] else {
        panic!("expected plan review, got {:?}", screens[0]);
    };
    assert_eq!(draft.amount, "1500");
}
