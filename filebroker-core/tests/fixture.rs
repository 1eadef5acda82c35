use filebroker_core::{
    file::FileRecord,
    notebook::{Notebook, NotebookAction, NotebookInfo},
    report::sender::{OutcomeMessage, OutcomeSender},
    store::mock::MockStore,
    FileBroker, ReportFn,
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Fixture {
    pub broker: FileBroker,
    pub store: MockStore,
    pub notebook: Notebook,
    pub sender: OutcomeSender,
    #[allow(dead_code)]
    pub outcome_rx: mpsc::UnboundedReceiver<OutcomeMessage>,
}

/// The notebook every test starts from: three files with ids 0..=2
#[allow(dead_code)]
pub fn initial_notebook() -> NotebookInfo {
    NotebookInfo::new(
        "notebook-0",
        vec![
            FileRecord::new(0, "file1.csv", "2019-04-03T16:51:45.075609+00:00"),
            FileRecord::new(1, "file2.csv", "2019-04-01T14:51:00.075609+00:00"),
            FileRecord::new(2, "file3.csv", "2019-03-29T22:22:12.075609+00:00"),
        ],
    )
}

impl Fixture {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let store = MockStore::new();
        let notebook = Notebook::new(initial_notebook());
        let broker = FileBroker::new(Arc::new(store.clone()), Arc::new(notebook.clone()));
        let (sender, outcome_rx) = OutcomeSender::new();

        Fixture {
            broker,
            store,
            notebook,
            sender,
            outcome_rx,
        }
    }

    /// A fresh one-shot report function wired to the fixture's channel
    #[allow(dead_code)]
    pub fn reporter(&self) -> ReportFn {
        self.sender.reporter()
    }

    /// Every report emitted so far as `(kind, body)` JSON, the same shape
    /// the evaluation frame receives
    #[allow(dead_code)]
    pub fn reports(&self) -> Vec<serde_json::Value> {
        self.sender
            .history()
            .into_iter()
            .map(|m| serde_json::json!([m.kind, m.body]))
            .collect()
    }

    #[allow(dead_code)]
    pub fn actions(&self) -> Vec<NotebookAction> {
        self.notebook.dispatched_actions()
    }
}

pub fn run<F, Fut>(test_fn: F)
where
    F: FnOnce(Fixture) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    use tokio::time::{timeout, Duration};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    runtime.block_on(async {
        let fixture = Fixture::new();
        timeout(Duration::from_secs(30), test_fn(fixture))
            .await
            .expect("Test timed out after 30 seconds");
    });
}
