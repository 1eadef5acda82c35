use anyhow::{Context, Result};
use filebroker_core::file::{DeleteOptions, LoadOptions, SaveOptions};
use filebroker_core::report::sender::{OutcomeMessage, OutcomeSender};
use filebroker_core::{FileBroker, FileRequest, Settings};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinSet;
use tracing::{error, info};

/// One line of input from the evaluation frame.
///
/// Every field is optional so that a request missing an argument still
/// parses and is rejected by the broker's own validation.
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum BridgeRequest {
    Load {
        filename: Option<String>,
        #[serde(rename = "fileRequestID")]
        file_request_id: Option<String>,
        options: Option<LoadOptions>,
    },
    Save {
        filename: Option<String>,
        #[serde(rename = "fileRequestID")]
        file_request_id: Option<String>,
        options: Option<SaveOptions>,
    },
    Delete {
        filename: Option<String>,
        #[serde(rename = "fileRequestID")]
        file_request_id: Option<String>,
        options: Option<DeleteOptions>,
    },
}

/// Serve the broker over stdin/stdout.
pub async fn run_subprocess(broker: FileBroker) -> Result<()> {
    run_bridge(broker, BufReader::new(io::stdin()), io::stdout()).await
}

/// Read JSON-lines requests from `reader` until EOF, run them concurrently
/// and write every report to `writer` as a JSON line. Returns once all
/// accepted requests have reported.
pub async fn run_bridge<R, W>(broker: FileBroker, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (sender, mut outcome_rx) = OutcomeSender::new();
    let mut operations: JoinSet<()> = JoinSet::new();
    let mut lines = reader.lines();
    let mut reading = true;

    info!(store = broker.store_name(), "File request bridge started");

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                match line.context("Failed to read request line")? {
                    Some(line) => dispatch(&broker, &sender, &line, &mut operations),
                    None => reading = false,
                }
            }
            Some(message) = outcome_rx.recv() => {
                write_message(&mut writer, &message).await?;
            }
            Some(joined) = operations.join_next(), if !operations.is_empty() => {
                if let Err(err) = joined {
                    error!(%err, "File operation task failed");
                }
            }
            else => break,
        }

        if !reading && operations.is_empty() {
            break;
        }
    }

    // All report functions are consumed or dropped by now; closing our own
    // handle lets the receiver drain and finish.
    drop(sender);
    while let Some(message) = outcome_rx.recv().await {
        write_message(&mut writer, &message).await?;
    }
    writer.flush().await?;

    info!("File request bridge finished");
    Ok(())
}

fn dispatch(
    broker: &FileBroker,
    sender: &OutcomeSender,
    line: &str,
    operations: &mut JoinSet<()>,
) {
    if line.trim().is_empty() {
        return;
    }

    let request: BridgeRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            error!(%err, "Malformed file request line");
            return;
        }
    };

    let report = Some(sender.reporter());
    let result = match request {
        BridgeRequest::Load {
            filename,
            file_request_id,
            options,
        } => broker.load_file(FileRequest {
            filename,
            file_request_id,
            options,
            report,
        }),
        BridgeRequest::Save {
            filename,
            file_request_id,
            options,
        } => broker.save_file(FileRequest {
            filename,
            file_request_id,
            options,
            report,
        }),
        BridgeRequest::Delete {
            filename,
            file_request_id,
            options,
        } => broker.delete_file(FileRequest {
            filename,
            file_request_id,
            options,
            report,
        }),
    };

    match result {
        Ok(pending) => {
            operations.spawn(pending);
        }
        // Integration bugs are logged, never echoed back to the frame.
        Err(err) => error!(%err, "Rejected file request"),
    }
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, message: &OutcomeMessage) -> Result<()> {
    let json = serde_json::to_string(message)?;
    let json = format!("{json}\n");
    writer.write_all(json.as_bytes()).await?;
    Ok(())
}

/// Install a file-backed tracing subscriber configured from `settings`.
/// Returns the log file path.
pub fn setup_tracing(settings: &Settings) -> Result<PathBuf> {
    use std::fs;
    use tracing_subscriber::fmt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let trace_dir = match &settings.trace_dir {
        Some(dir) => dir.clone(),
        None => dirs::home_dir()
            .context("Failed to get home directory")?
            .join(".filebroker")
            .join("trace"),
    };
    fs::create_dir_all(&trace_dir)
        .with_context(|| format!("Failed to create trace directory {trace_dir:?}"))?;

    let log_file = trace_dir.join("filebroker.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("Invalid log filter: {}", settings.log_filter))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .context("Tracing already initialized")?;

    info!("Tracing initialized to {:?}", log_file);
    Ok(log_file)
}
