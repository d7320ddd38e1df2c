//! Account read endpoints used by `rise balance`.

use rise_engine::MutationError;
use rust_decimal::Decimal;
use serde_json::json;

use crate::common::{client_for, mount_json, start_rise_mock};

#[tokio::test]
async fn session_and_plans_decode() {
    let server = start_rise_mock().await;
    mount_json(
        &server,
        "GET",
        "/sessions",
        200,
        json!({"total_balance": 10250.5, "total_returns": 250.5}),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/plans",
        200,
        json!([{
            "id": "plan-1",
            "plan_name": "Car Fund",
            "invested_amount": 3000,
            "total_returns": 120,
            "target_amount": 9000,
            "maturity_date": "2027-04-20",
        }]),
    )
    .await;

    let client = client_for(&server);
    let session = client.session().await.unwrap();
    assert_eq!(session.total_balance.round_dp(1), Decimal::new(102_505, 1));

    let plans = client.plans().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].plan_name, "Car Fund");
    assert_eq!(plans[0].target_amount, Decimal::from(9000));
}

#[tokio::test]
async fn unauthorized_session_reports_api_error() {
    let server = start_rise_mock().await;
    mount_json(&server, "GET", "/sessions", 401, json!({"error": "token expired"})).await;

    let err = client_for(&server).session().await.unwrap_err();
    assert_eq!(
        err,
        MutationError::Api {
            status: 401,
            message: "token expired".into(),
        }
    );
}
