//! # Scan Runtime
//!
//! Wires the codec oracle, the stitcher worker and an event logger, then
//! pumps input lines through them until EOF.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use vs_02_frame_stitcher::{
    BroadcastPublisher, CodecOracle, FrameStitcher, IngestOutcome, MetricsSnapshot, ScanEvent,
    ScanEventKind, ScanMetrics, StitcherWorker,
};
use vs_telemetry::{log_event, log_scan_event};

use crate::config::RuntimeConfig;
use crate::output::ScanReport;

/// Component name attached to runtime logs.
pub const COMPONENT: &str = "scan-runtime";

/// What a run processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank input lines.
    pub lines_read: u64,
    /// JSON reports written.
    pub reports: u64,
    /// Terminal scan events seen by the event logger.
    pub terminal_events: u64,
    pub metrics: MetricsSnapshot,
}

/// Headless scanner over a line-oriented input.
pub struct ScanRuntime {
    config: RuntimeConfig,
}

impl ScanRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Process `input` to EOF, writing one JSON line per completed scan.
    ///
    /// After each report the session is reset so the next line starts a new scan.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let metrics = Arc::new(ScanMetrics::new());
        let oracle = Arc::new(CodecOracle::new(self.config.codec));
        let stitcher =
            FrameStitcher::with_metrics(oracle, self.config.stitcher.clone(), metrics.clone());

        let publisher = Arc::new(BroadcastPublisher::new(self.config.stitcher.event_capacity));
        let logger = tokio::spawn(log_events(publisher.subscribe()));
        let (handle, worker) = StitcherWorker::spawn(stitcher, publisher);

        let mut summary = RunSummary::default();
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("failed to read input")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            summary.lines_read += 1;

            let epoch = handle.epoch();
            let Some(outcome) = handle.ingest(line).await? else {
                continue;
            };
            if let IngestOutcome::Rejected(err) = &outcome {
                warn!(line = summary.lines_read, error = %err, "input line rejected");
                continue;
            }
            if let Some(report) = ScanReport::from_outcome(epoch, &outcome) {
                let mut line = report.to_json_line()?;
                line.push('\n');
                output
                    .write_all(line.as_bytes())
                    .await
                    .context("failed to write report")?;
                output.flush().await.context("failed to flush output")?;
                summary.reports += 1;
                handle.reset();
            }
        }

        handle.shutdown().await?;
        worker.await.context("stitcher worker panicked")?;
        summary.terminal_events = logger.await.context("event logger panicked")?;

        summary.metrics = metrics.snapshot();
        info!(
            lines = summary.lines_read,
            reports = summary.reports,
            "input drained"
        );
        Ok(summary)
    }
}

/// Log scan events until the publisher goes away. Returns the number of
/// terminal events seen.
async fn log_events(mut events: broadcast::Receiver<ScanEvent>) -> u64 {
    let mut terminal = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                if event.is_terminal() {
                    terminal += 1;
                }
                log_scan(&event);
            }
            Err(RecvError::Lagged(skipped)) => {
                log_event!(warn, COMPONENT, "event log lagging", skipped = skipped)
            }
            Err(RecvError::Closed) => break,
        }
    }
    terminal
}

fn log_scan(event: &ScanEvent) {
    match &event.kind {
        ScanEventKind::Progress(progress) => {
            log_scan_event!(debug, COMPONENT, "scan progress", event.epoch, progress)
        }
        ScanEventKind::FrameRejected(err) => {
            log_event!(warn, COMPONENT, "frame rejected", epoch = event.epoch, error = %err)
        }
        ScanEventKind::Decoded(payload) => log_event!(
            info,
            COMPONENT,
            "payload decoded",
            epoch = event.epoch,
            payload_type = ?payload.payload_type()
        ),
        ScanEventKind::PasswordRequired(shares) => log_event!(
            info,
            COMPONENT,
            "banana split shares complete",
            epoch = event.epoch,
            captured = shares.frames().len()
        ),
        ScanEventKind::DecodeFailed(err) => {
            log_event!(warn, COMPONENT, "decode failed", epoch = event.epoch, error = %err)
        }
        ScanEventKind::Reset => log_event!(debug, COMPONENT, "session reset", epoch = event.epoch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(bytes: &[u8]) -> String {
        format!("4{:04x}{}", bytes.len(), hex::encode(bytes))
    }

    fn legacy_line(total: u16, index: u16, data: &[u8]) -> String {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&total.to_be_bytes());
        bytes.extend_from_slice(&index.to_be_bytes());
        bytes.extend_from_slice(data);
        wrap(&bytes)
    }

    async fn run(input: String) -> (RunSummary, Vec<serde_json::Value>) {
        let mut output: Vec<u8> = Vec::new();
        let summary = ScanRuntime::new(RuntimeConfig::default())
            .run(input.as_bytes(), &mut output)
            .await
            .unwrap();
        let reports = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (summary, reports)
    }

    #[tokio::test]
    async fn test_multi_frame_then_single_frame() {
        let input = [
            legacy_line(2, 1, &[0x02]),
            legacy_line(2, 1, &[0x02]),
            legacy_line(2, 0, &[0x53, 0x01]),
            wrap(&[0x53, 0x01, 0xdf, 0x00]),
        ]
        .join("\n");

        let (summary, reports) = run(input).await;
        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.reports, 2);
        assert_eq!(summary.terminal_events, 2);
        assert_eq!(summary.metrics.duplicates_dropped, 1);

        assert_eq!(reports[0]["outcome"], "decoded");
        assert_eq!(reports[0]["payload_type"], "transaction");
        assert_eq!(reports[0]["payload"][0], "530102");
        assert_eq!(reports[1]["payload_type"], "dynamic_derivations");
        assert_eq!(reports[1]["epoch"], 1);
    }

    #[tokio::test]
    async fn test_blank_and_malformed_lines_are_skipped() {
        let input = format!("\n   \nnot-a-frame\n{}\n", wrap(&[0x53, 0x01, 0x02]));
        let (summary, reports) = run(input).await;

        assert_eq!(summary.lines_read, 2);
        assert_eq!(summary.metrics.frames_rejected, 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["payload"][0], "530102");
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported_and_scanning_continues() {
        let input = [
            legacy_line(2, 0, &[0xaa]),
            legacy_line(2, 0, &[0xab]),
            wrap(&[0x53, 0x01, 0x02]),
        ]
        .join("\n");

        let (_summary, reports) = run(input).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["outcome"], "decode_failed");
        assert_eq!(reports[1]["outcome"], "decoded");
    }

    #[tokio::test]
    async fn test_banana_split_requests_password() {
        let share = |data: &str| {
            wrap(
                format!(r#"{{"v":1,"t":"cold","r":2,"d":"{data}","n":"bm9uY2U="}}"#).as_bytes(),
            )
        };
        let input = [share("QUFB"), share("QkJC")].join("\n");

        let (_summary, reports) = run(input).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["outcome"], "password_required");
        assert_eq!(reports[0]["frames"], 2);
    }

    #[tokio::test]
    async fn test_chunked_input() {
        let line = wrap(&[0x53, 0x01, 0x02]);
        let (head, tail) = line.split_at(5);
        let reader = tokio::io::BufReader::new(
            tokio_test::io::Builder::new()
                .read(head.as_bytes())
                .read(tail.as_bytes())
                .read(b"\n")
                .build(),
        );

        let mut output: Vec<u8> = Vec::new();
        let summary = ScanRuntime::new(RuntimeConfig::default())
            .run(reader, &mut output)
            .await
            .unwrap();
        assert_eq!(summary.reports, 1);
    }
}
