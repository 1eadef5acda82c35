use filebroker_core::file::{FileRecord, SavedFile};
use filebroker_core::notebook::{Notebook, NotebookAction, NotebookInfo};
use filebroker_core::report::sender::OutcomeMessage;
use filebroker_core::report::MessageKind;
use filebroker_core::store::mock::{MockBehavior, MockStore};
use filebroker_core::FileBroker;
use filebroker_subprocess::run_bridge;
use std::sync::Arc;

fn setup() -> (FileBroker, MockStore, Notebook) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let store = MockStore::new();
    let notebook = Notebook::new(NotebookInfo::new(
        "notebook-0",
        vec![
            FileRecord::new(0, "file1.csv", "2019-04-03T16:51:45.075609+00:00"),
            FileRecord::new(1, "file2.csv", "2019-04-01T14:51:00.075609+00:00"),
        ],
    ));
    let broker = FileBroker::new(Arc::new(store.clone()), Arc::new(notebook.clone()));
    (broker, store, notebook)
}

async fn drive(broker: FileBroker, input: &str) -> Vec<OutcomeMessage> {
    let mut output: Vec<u8> = Vec::new();
    run_bridge(broker, input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn find<'a>(messages: &'a [OutcomeMessage], id: &str) -> Vec<&'a OutcomeMessage> {
    messages
        .iter()
        .filter(|m| m.body.file_request_id() == id)
        .collect()
}

#[tokio::test]
async fn test_each_accepted_request_gets_one_line() {
    let (broker, store, notebook) = setup();
    store.set_load_content("a,b\n1,2\n");
    store.push_save_response(SavedFile {
        filename: "new.csv".to_string(),
        id: 7,
        last_updated: "D".to_string(),
    });

    let input = [
        r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "r1", "options": {"fetchType": "text"}}"#,
        r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "r2", "options": {"fetchType": "json"}}"#,
        r#"{"operation": "save", "filename": "new.csv", "fileRequestID": "r3", "options": {"overwrite": false}}"#,
        r#"{"operation": "save", "filename": "file2.csv", "fileRequestID": "r4", "options": {"overwrite": false}}"#,
        r#"{"operation": "delete", "filename": "file1.csv", "fileRequestID": "r5"}"#,
        r#"{"operation": "delete", "filename": "nope.csv", "fileRequestID": "r6", "options": null}"#,
    ]
    .join("\n");

    let messages = drive(broker, &input).await;
    assert_eq!(messages.len(), 6);

    for (id, kind) in [
        ("r1", MessageKind::RequestedFileOperationSuccess),
        ("r2", MessageKind::RequestedFileOperationError),
        ("r3", MessageKind::RequestedFileOperationSuccess),
        ("r4", MessageKind::RequestedFileOperationError),
        ("r5", MessageKind::RequestedFileOperationSuccess),
        ("r6", MessageKind::RequestedFileOperationError),
    ] {
        let matching = find(&messages, id);
        assert_eq!(matching.len(), 1, "expected one message for {id}");
        assert_eq!(matching[0].kind, kind, "wrong kind for {id}");
    }

    let mut actions = notebook.dispatched_actions();
    actions.sort_by_key(|a| format!("{a:?}"));
    assert_eq!(
        actions,
        vec![
            NotebookAction::AddFileToNotebook {
                filename: "new.csv".to_string(),
                last_updated: "D".to_string(),
                file_id: 7,
            },
            NotebookAction::DeleteFileFromNotebook { file_id: 0 },
        ]
    );
}

#[tokio::test]
async fn test_contract_violations_and_garbage_are_not_reported() {
    let (broker, store, _notebook) = setup();

    let input = [
        "",
        "not json at all",
        r#"{"operation": "rename", "filename": "file1.csv", "fileRequestID": "x1"}"#,
        r#"{"operation": "load", "fileRequestID": "x2", "options": {"fetchType": "text"}}"#,
        r#"{"operation": "load", "filename": "file1.csv", "options": {"fetchType": "text"}}"#,
        r#"{"operation": "save", "filename": "file1.csv", "fileRequestID": "x3"}"#,
        r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "ok", "options": {"fetchType": "text"}}"#,
    ]
    .join("\n");

    let messages = drive(broker, &input).await;

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body.file_request_id(), "ok");
    assert_eq!(store.load_count(), 1);
}

#[tokio::test]
async fn test_store_failures_are_forwarded_as_error_lines() {
    let (broker, store, notebook) = setup();
    store.set_delete_behavior(MockBehavior::delayed(10, MockBehavior::fail("artificial error")));

    let input = r#"{"operation": "delete", "filename": "file2.csv", "fileRequestID": "d1"}"#;
    let messages = drive(broker, input).await;

    assert_eq!(messages.len(), 1);
    assert_eq!(
        serde_json::to_value(&messages[0]).unwrap(),
        serde_json::json!({
            "kind": "REQUESTED_FILE_OPERATION_ERROR",
            "body": { "reason": "artificial error", "fileRequestID": "d1" }
        })
    );
    assert!(notebook.dispatched_actions().is_empty());
}

#[tokio::test]
async fn test_empty_input_finishes_cleanly() {
    let (broker, store, _notebook) = setup();
    let messages = drive(broker, "").await;
    assert!(messages.is_empty());
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_load_without_usable_fetch_type_still_reports() {
    let (broker, store, _notebook) = setup();

    let input = [
        r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "f1", "options": {}}"#,
        r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "f2", "options": {"fetchType": 5}}"#,
    ]
    .join("\n");

    let messages = drive(broker, &input).await;

    let mut bodies: Vec<_> = messages
        .iter()
        .map(|m| serde_json::to_value(m).unwrap())
        .collect();
    bodies.sort_by_key(|b| b["body"]["fileRequestID"].to_string());
    assert_eq!(
        bodies,
        vec![
            serde_json::json!({
                "kind": "REQUESTED_FILE_OPERATION_ERROR",
                "body": { "reason": "invalid fetch type \"undefined\"", "fileRequestID": "f1" }
            }),
            serde_json::json!({
                "kind": "REQUESTED_FILE_OPERATION_ERROR",
                "body": { "reason": "invalid fetch type \"5\"", "fileRequestID": "f2" }
            }),
        ]
    );
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_loaded_text_is_sent_as_bare_string() {
    let (broker, store, _notebook) = setup();
    store.set_load_content("loaded-file-contents");

    let input = r#"{"operation": "load", "filename": "file1.csv", "fileRequestID": "r1", "options": {"fetchType": "text"}}"#;
    let messages = drive(broker, input).await;

    assert_eq!(messages.len(), 1);
    assert_eq!(
        serde_json::to_value(&messages[0]).unwrap(),
        serde_json::json!({
            "kind": "REQUESTED_FILE_OPERATION_SUCCESS",
            "body": { "response": "loaded-file-contents", "fileRequestID": "r1" }
        })
    );
}
