use std::fs;
use std::time::Duration;

use cert_lookup_core::contract::CallbackStatus;
use cert_lookup_lambda::adapters::callback::HttpCallbackNotifier;
use cert_lookup_lambda::adapters::inventory::FileCertificateInventory;
use cert_lookup_lambda::handlers::lookup::{handle_lookup_event, InvocationContext};
use mockito::Matcher;
use serde_json::json;

fn custom_resource_event(response_url: String, domain_name: &str) -> serde_json::Value {
    json!({
        "RequestType": "Create",
        "ResponseURL": response_url,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/my-stack/abc",
        "RequestId": "req-1",
        "LogicalResourceId": "Certificate",
        "ResourceProperties": {"DomainName": domain_name}
    })
}

fn context() -> InvocationContext {
    InvocationContext {
        request_id: "lambda-req".to_string(),
        log_stream_name: "2024/11/01/[$LATEST]stream".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn file_inventory_match_is_delivered_as_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inventory_path = dir.path().join("inventory.json");
    fs::write(
        &inventory_path,
        r#"[{"DomainName": "gokanmalkoc.click", "CertificateArn": "arn:aws:acm:us-east-1:123456789012:certificate/abc"}]"#,
    )
    .expect("write inventory");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/response")
        .match_body(Matcher::PartialJson(json!({
            "Status": "SUCCESS",
            "RequestId": "req-1",
            "Data": {"CertificateArn": "arn:aws:acm:us-east-1:123456789012:certificate/abc"}
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let notifier = HttpCallbackNotifier::new(Duration::from_secs(5)).expect("client");
    let report = handle_lookup_event(
        &custom_resource_event(format!("{}/response", server.url()), "gokanmalkoc.click"),
        &context(),
        &FileCertificateInventory::new(&inventory_path),
        &notifier,
    )
    .expect("addressable request");

    assert_eq!(report.status, CallbackStatus::Success);
    assert!(report.callback_delivered);
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreadable_inventory_is_delivered_as_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing_path = dir.path().join("missing.json");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/response")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"Status": "FAILED"})),
            Matcher::Regex("failed to read inventory file".to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let notifier = HttpCallbackNotifier::new(Duration::from_secs(5)).expect("client");
    let report = handle_lookup_event(
        &custom_resource_event(format!("{}/response", server.url()), "gokanmalkoc.click"),
        &context(),
        &FileCertificateInventory::new(&missing_path),
        &notifier,
    )
    .expect("addressable request");

    assert_eq!(report.status, CallbackStatus::Failed);
    assert!(report.callback_delivered);
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_stack_id_is_answered_with_one_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inventory_path = dir.path().join("inventory.json");
    fs::write(&inventory_path, "[]").expect("write inventory");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/response")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"Status": "FAILED", "StackId": "", "RequestId": "req-1"})),
            Matcher::Regex("StackId".to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut event = custom_resource_event(format!("{}/response", server.url()), "gokanmalkoc.click");
    event
        .as_object_mut()
        .expect("object event")
        .remove("StackId");

    let notifier = HttpCallbackNotifier::new(Duration::from_secs(5)).expect("client");
    let report = handle_lookup_event(
        &event,
        &context(),
        &FileCertificateInventory::new(&inventory_path),
        &notifier,
    )
    .expect("ResponseURL is present");

    assert_eq!(report.status, CallbackStatus::Failed);
    assert!(report.callback_delivered);
    mock.assert_async().await;
}
