//! Whole-job tests: request in, response out, with mock storage.

mod common;

use serde_json::json;
use visibility_core::{JobValue, ResultKind, StorageError, TransferMode};

use common::{
    has_line, line_position, request, TestHarness, INPUT_KEY, OUTPUT_COLLECTION, RESULT_NAME,
};

#[tokio::test]
async fn test_job_fetches_exact_input_and_uploads_result() {
    let harness = TestHarness::new(&format!(
        "echo '{{\"visibility\": 1200}}' > {}.json",
        RESULT_NAME
    ));
    harness
        .storage
        .insert_object(INPUT_KEY, b"jpeg-bytes".to_vec())
        .await;

    let response = harness.handle(request("webdav")).await;

    assert_eq!(response.result, ResultKind::Value);
    assert_eq!(response.value, Some(JobValue::ok()));
    assert_eq!(response.request, request("webdav"));
    assert_eq!(harness.storage.fetched_keys().await, vec![INPUT_KEY.to_string()]);

    let output_key = format!("{}/{}.json", OUTPUT_COLLECTION, RESULT_NAME);
    assert_eq!(harness.storage.put_keys().await, vec![output_key.clone()]);
    assert_eq!(
        harness.storage.object(&output_key).await,
        Some(b"{\"visibility\": 1200}\n".to_vec())
    );
    assert!(harness
        .work_dir()
        .join("panasonic_fullhd_01-1-1-202351100.jpg")
        .exists());
}

#[tokio::test]
async fn test_response_serializes_as_value_envelope() {
    let harness = TestHarness::new("exit 0");
    harness.storage.insert_object(INPUT_KEY, vec![0xFF]).await;

    let response = harness.handle(request("webdav")).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["result"], "value");
    assert_eq!(json["value"], json!({"result": "OK"}));
    assert!(json.get("exception").is_none());
    assert!(json["log"].as_array().unwrap().len() > 5);
}

#[tokio::test]
async fn test_unsupported_storage_type_is_exception() {
    let harness = TestHarness::new("touch ran.txt");

    let response = harness.handle(request("ftp")).await;

    assert_eq!(response.result, ResultKind::Exception);
    assert!(response.value.is_none());
    assert!(response.exception.as_deref().unwrap().contains("ftp"));
    assert!(has_line(&response, "job: creating working directory"));
    assert!(!has_line(&response, "job: downloading input data"));
    assert_eq!(harness.connector.connect_count(), 0);
    assert!(!harness.work_dir().join("ran.txt").exists());
}

#[tokio::test]
async fn test_missing_datetime_field_has_empty_log() {
    let harness = TestHarness::new("exit 0");
    let mut bad = request("webdav");
    bad["datetime"].as_object_mut().unwrap().remove("minute");

    let response = harness.handle(bad.clone()).await;

    assert_eq!(response.result, ResultKind::Exception);
    assert!(response.exception.as_deref().unwrap().contains("minute"));
    assert!(response.log.is_empty());
    assert_eq!(response.request, bad);
    assert!(!harness.work_dir().exists());
}

#[tokio::test]
async fn test_out_of_range_month_is_rejected() {
    let harness = TestHarness::new("exit 0");
    let mut bad = request("webdav");
    bad["datetime"]["month"] = json!(13);

    let response = harness.handle(bad).await;

    assert_eq!(response.result, ResultKind::Exception);
    assert!(response.exception.as_deref().unwrap().contains("month"));
    assert!(response.log.is_empty());
}

#[tokio::test]
async fn test_listings_before_and_after_analyzer() {
    let harness = TestHarness::with_config("touch result.json", |config| {
        config.transfer.mode = TransferMode::Multi;
        config.analyzer.result_name = "result".to_string();
    });
    harness
        .storage
        .insert_object(
            "visibility/input/2023/05/01/1000-001-001/a.jpg",
            b"jpeg".to_vec(),
        )
        .await;

    let response = harness.handle(request("webdav")).await;
    assert!(response.is_success());

    let before = line_position(&response, "runner: before file \"a.jpg\"").unwrap();
    let executing = line_position(&response, "runner: executing...").unwrap();
    let after_a = line_position(&response, "runner: after file \"a.jpg\"").unwrap();
    let after_result = line_position(&response, "runner: after file \"result.json\"").unwrap();

    assert!(executing < before);
    assert!(before < after_a);
    assert!(after_a < after_result);
    assert!(!has_line(&response, "runner: before file \"result.json\""));
    assert!(has_line(&response, "job: downloaded 1 files (4 bytes)"));
    assert_eq!(
        harness.storage.put_keys().await,
        vec![format!("{}/result.json", OUTPUT_COLLECTION)]
    );
}

#[tokio::test]
async fn test_analyzer_output_captured_in_log() {
    let harness = TestHarness::new("echo visibility computed; echo warning >&2");
    harness.storage.insert_object(INPUT_KEY, vec![1, 2, 3]).await;

    let response = harness.handle(request("webdav")).await;

    assert!(response.is_success());
    let stderr = line_position(&response, "runner: stderr: warning").unwrap();
    let stdout = line_position(&response, "runner: stdout: visibility computed").unwrap();
    assert!(stderr < stdout);
}

#[tokio::test]
async fn test_second_job_reuses_working_directory() {
    let harness = TestHarness::new("exit 0");
    harness.storage.insert_object(INPUT_KEY, vec![1]).await;

    let first = harness.handle(request("webdav")).await;
    let second = harness.handle(request("webdav")).await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert!(has_line(&first, &format!("{} created", harness.work_dir().display())));
    assert!(has_line(&second, " not created"));
}

#[tokio::test]
async fn test_download_failure_skips_analyzer() {
    let harness = TestHarness::new("touch ran.txt");
    harness
        .storage
        .set_next_error(StorageError::ConnectionFailed("connection refused".to_string()))
        .await;

    let response = harness.handle(request("webdav")).await;

    assert_eq!(response.result, ResultKind::Exception);
    assert!(response
        .exception
        .as_deref()
        .unwrap()
        .contains("connection refused"));
    assert!(has_line(&response, "job: downloading input data"));
    assert!(!has_line(&response, "job: starting execution"));
    assert!(!harness.work_dir().join("ran.txt").exists());
}

#[tokio::test]
async fn test_failing_analyzer_still_uploads_by_default() {
    let harness = TestHarness::new(&format!("touch {}.png; exit 3", RESULT_NAME));
    harness.storage.insert_object(INPUT_KEY, vec![1]).await;

    let response = harness.handle(request("webdav")).await;

    assert!(response.is_success());
    assert!(response
        .log
        .iter()
        .any(|l| l.contains("runner: analyzer exited with") && l.contains('3')));
    assert_eq!(harness.storage.put_keys().await.len(), 1);
}

#[tokio::test]
async fn test_failing_analyzer_reported_when_enabled() {
    let harness = TestHarness::with_config("exit 3", |config| {
        config.analyzer.report_subprocess_failure = true;
    });
    harness.storage.insert_object(INPUT_KEY, vec![1]).await;

    let response = harness.handle(request("webdav")).await;

    assert_eq!(response.result, ResultKind::Exception);
    assert!(!has_line(&response, "job: uploading output data"));
    assert!(response
        .log
        .last()
        .unwrap()
        .contains("job: failed:"));
}

#[tokio::test]
async fn test_request_without_orientation() {
    let harness = TestHarness::new(&format!("touch {}.json", RESULT_NAME));
    harness
        .storage
        .insert_object(
            "visibility/input/2023/05/01/panasonic_fullhd_01-202351100.jpg",
            vec![1],
        )
        .await;
    let mut req = request("webdav");
    let datetime = req["datetime"].as_object_mut().unwrap();
    datetime.remove("pan");
    datetime.remove("azimuth");

    let response = harness.handle(req).await;

    assert!(response.is_success(), "{:?}", response.exception);
    assert_eq!(
        harness.storage.put_keys().await,
        vec![format!(
            "visibility/output/2023/05/01/1000/{}.json",
            RESULT_NAME
        )]
    );
}

#[tokio::test]
async fn test_results_of_previous_job_are_not_uploaded_again() {
    let harness = TestHarness::new(&format!(
        "if [ \"$4\" = 1-1 ]; then echo job1 > {}.json; else exit 3; fi",
        RESULT_NAME
    ));
    harness.storage.insert_object(INPUT_KEY, vec![1]).await;
    harness
        .storage
        .insert_object(
            "visibility/input/2023/05/01/panasonic_fullhd_01-2-1-202351100.jpg",
            vec![2],
        )
        .await;
    let mut second = request("webdav");
    second["datetime"]["pan"] = json!(2);

    let first_response = harness.handle(request("webdav")).await;
    let second_response = harness.handle(second).await;

    assert!(first_response.is_success());
    assert!(has_line(&first_response, "job: uploaded 1 files"));
    assert!(second_response.is_success());
    assert!(has_line(&second_response, "job: uploaded 0 files"));
    assert_eq!(
        harness.storage.put_keys().await,
        vec![format!("{}/{}.json", OUTPUT_COLLECTION, RESULT_NAME)]
    );
    assert!(!harness.work_dir().join(format!("{}.json", RESULT_NAME)).exists());
}
