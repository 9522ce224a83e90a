mod common;

use common::{
    backend_settings, credentials, workflow_settings, TEST_PROJECT_ID, TEST_PROJECT_NAME,
    TEST_ROLE, TEST_TOKEN,
};
use democli::report::write_samples;
use democli::workflow;
use plm_core::plm::{BackendCall, MockPlmBackend};
use plm_core::PlmError;
use serde_json::json;
use std::io;

fn happy_backend() -> MockPlmBackend {
    MockPlmBackend::new(TEST_TOKEN)
        .with_project(TEST_PROJECT_ID, TEST_PROJECT_NAME, &[TEST_ROLE])
        .with_search_results(&["E42"])
        .with_values(vec![json!(10), json!(20), json!(30)])
}

#[tokio::test]
async fn end_to_end_prints_projects_and_values_then_logs_out() {
    let backend = happy_backend();

    let mut out = Vec::new();
    let report = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut out,
    )
    .await
    .expect("workflow failed");

    assert_eq!(report.project.project_model_id, TEST_PROJECT_ID);
    assert_eq!(report.role, TEST_ROLE);
    assert_eq!(report.container.instance_id, "E42");

    write_samples(&report.samples, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Available projects:\nName: Bike demo\nSensor data:\n10\n20\n30\n"
    );

    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn stages_run_in_order_with_derived_inputs() {
    let backend = happy_backend();

    workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .expect("workflow failed");

    let calls = backend.calls();
    assert_eq!(calls.len(), 6);
    assert!(matches!(&calls[0], BackendCall::Authenticate { user, port: 9090, .. } if user == "u"));
    assert!(matches!(&calls[1], BackendCall::ListUserProjects { token } if token == TEST_TOKEN));
    assert!(matches!(&calls[2], BackendCall::ListUserProjects { .. }));
    match &calls[3] {
        BackendCall::SearchNodes { token, search } => {
            assert_eq!(token, TEST_TOKEN);
            assert_eq!(search.model, TEST_PROJECT_ID);
            assert_eq!(search.repository, "TruePLMprojectsRep");
            assert_eq!(search.user_type, TEST_ROLE);
        }
        other => panic!("expected search, got {:?}", other),
    }
    match &calls[4] {
        BackendCall::GetAggregatedProperty { token, query } => {
            assert_eq!(token, TEST_TOKEN);
            assert_eq!(query.node, "E42");
            assert_eq!(query.model, TEST_PROJECT_ID);
            assert_eq!(query.page, 1);
            assert_eq!(query.page_size, 3);
        }
        other => panic!("expected aggregated property, got {:?}", other),
    }
    assert_eq!(
        calls[5],
        BackendCall::Deauthenticate {
            token: TEST_TOKEN.to_string()
        }
    );
}

#[tokio::test]
async fn rejected_login_makes_no_further_calls() {
    let backend = MockPlmBackend::rejecting_login(json!("bad credentials"));

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlmError::AuthError(_)));
    assert_eq!(backend.calls().len(), 1);
    assert_eq!(backend.logout_count(), 0);
}

#[tokio::test]
async fn no_projects_aborts_before_search_and_still_logs_out() {
    let backend = MockPlmBackend::new(TEST_TOKEN).with_search_results(&["E42"]);

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(err.is_empty_result());
    assert_eq!(err.exit_code(), 4);

    let calls = backend.calls();
    assert!(!calls
        .iter()
        .any(|c| matches!(c, BackendCall::SearchNodes { .. } | BackendCall::GetAggregatedProperty { .. })));
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn no_search_match_is_empty_result_and_logs_out() {
    let backend = MockPlmBackend::new(TEST_TOKEN).with_project(
        TEST_PROJECT_ID,
        TEST_PROJECT_NAME,
        &[TEST_ROLE],
    );

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(err.is_empty_result());
    assert!(!backend
        .calls()
        .iter()
        .any(|c| matches!(c, BackendCall::GetAggregatedProperty { .. })));
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn backend_failure_propagates_and_logs_out() {
    let backend = happy_backend().failing_search();

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlmError::BadGateway { status: 500, .. }));
    assert_eq!(err.exit_code(), 5);
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn role_less_membership_is_empty_result() {
    let backend = MockPlmBackend::new(TEST_TOKEN)
        .with_project(TEST_PROJECT_ID, TEST_PROJECT_NAME, &[])
        .with_search_results(&["E42"]);

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(err.is_empty_result());
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn failed_logout_does_not_hide_the_report() {
    let backend = happy_backend().failing_logout();

    let report = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut io::sink(),
    )
    .await
    .expect("workflow should succeed despite logout failure");

    assert_eq!(report.samples.values.len(), 3);
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn project_listing_is_printed_before_a_later_stage_fails() {
    let backend = MockPlmBackend::new(TEST_TOKEN).with_project(
        TEST_PROJECT_ID,
        TEST_PROJECT_NAME,
        &[TEST_ROLE],
    );

    let mut out = Vec::new();
    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &workflow_settings(),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(err.is_empty_result());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Available projects:\nName: Bike demo\n"
    );
}

#[tokio::test]
async fn malformed_start_time_fails_before_login() {
    let backend = happy_backend();
    let mut settings = workflow_settings();
    settings.sensor.from = "27/04/2020".to_string();

    let err = workflow::run(
        &backend,
        &credentials(),
        &backend_settings(),
        &settings,
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PlmError::ConfigError(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(backend.calls().is_empty());
}
