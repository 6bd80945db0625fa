//! # Integration Test Flows
//!
//! End-to-end scan flows over a scripted decode oracle.
//!
//! ## Flow Tested:
//!
//! 1. **Passphrase recovery**: shares → password request → countdown → seed
//! 2. **Abandoned recovery**: exhausted attempts return the scanner to idle
//! 3. **Reset races**: results of an abandoned epoch never reach observers
//! 4. **Progress stream**: snapshots only move forward in epoch

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use vs_02_frame_stitcher::test_utils::{RecordingPublisher, ScriptedOracle};
    use vs_02_frame_stitcher::{
        DecodedPayload, FrameIngestApi, FrameStitcher, IngestOutcome, RecoveredSeed,
        RecoveryStage, RecoveryStatus, ScanError, ScanEventKind, ScanMode, ScanSnapshot,
        SecretPassword, StitcherConfig, StitcherHandle, StitcherWorker,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SHARES: [&str; 3] = ["share-a", "share-b", "share-c"];

    fn banana_oracle() -> ScriptedOracle {
        ScriptedOracle::new()
            .with_sequence(&SHARES)
            .with_banana_split(&SHARES)
            .with_password("correct horse", "bottom drum")
    }

    fn scan_shares(stitcher: &mut FrameStitcher<ScriptedOracle>) {
        for share in SHARES {
            stitcher.on_frame_decoded(share);
        }
        assert_eq!(stitcher.session().mode(), ScanMode::AwaitingPassword);
    }

    fn spawn(
        oracle: ScriptedOracle,
    ) -> (
        StitcherHandle,
        tokio::task::JoinHandle<()>,
        Arc<RecordingPublisher>,
    ) {
        let publisher = Arc::new(RecordingPublisher::new());
        let stitcher = FrameStitcher::new(Arc::new(oracle), StitcherConfig::default());
        let (handle, join) = StitcherWorker::spawn(stitcher, Arc::clone(&publisher));
        (handle, join, publisher)
    }

    // =============================================================================
    // PASSPHRASE RECOVERY
    // =============================================================================

    #[test]
    fn test_passphrase_countdown_then_success() {
        let mut stitcher = FrameStitcher::new(Arc::new(banana_oracle()), StitcherConfig::default());
        scan_shares(&mut stitcher);

        let mut recovery = stitcher.begin_password_recovery().unwrap();
        assert_eq!(recovery.attempts_left(), 4);

        let wrong = SecretPassword::new("wrong");
        for expected_left in [3, 2, 1] {
            assert_eq!(
                recovery.attempt(&wrong),
                Err(ScanError::InvalidPassword {
                    attempts_left: expected_left
                })
            );
        }

        let seed = recovery.attempt(&SecretPassword::new("correct horse")).unwrap();
        assert_eq!(seed, RecoveredSeed::new("bottom drum"));
        assert_eq!(recovery.status(), RecoveryStatus::Recovered);
        assert_eq!(recovery.invalid_attempts(), 3);

        match stitcher.finish_password_recovery(true).unwrap() {
            Some(DecodedPayload::BananaSplitRecovery(shares)) => {
                assert_eq!(shares.stage(), RecoveryStage::Recovered);
                assert_eq!(shares.frames().len(), SHARES.len());
            }
            other => panic!("expected recovered shares, got {other:?}"),
        }
        assert_eq!(stitcher.session().mode(), ScanMode::Completed);
    }

    #[test]
    fn test_exhausted_passphrase_returns_to_idle() {
        let mut stitcher = FrameStitcher::new(Arc::new(banana_oracle()), StitcherConfig::default());
        scan_shares(&mut stitcher);

        let mut recovery = stitcher.begin_password_recovery().unwrap();
        let wrong = SecretPassword::new("wrong");
        for _ in 0..3 {
            assert!(matches!(
                recovery.attempt(&wrong),
                Err(ScanError::InvalidPassword { .. })
            ));
        }
        assert_eq!(
            recovery.attempt(&wrong),
            Err(ScanError::PasswordAttemptsExhausted)
        );
        assert_eq!(recovery.status(), RecoveryStatus::Closed);

        assert_eq!(stitcher.finish_password_recovery(false), Ok(None));
        assert_eq!(stitcher.session().mode(), ScanMode::Idle);
        assert!(matches!(
            stitcher.on_frame_decoded("share-a"),
            IngestOutcome::Progress(_)
        ));
    }

    #[test]
    fn test_finish_without_pending_shares_is_refused() {
        let mut stitcher = FrameStitcher::new(Arc::new(banana_oracle()), StitcherConfig::default());
        assert_eq!(
            stitcher.finish_password_recovery(true),
            Err(ScanError::NotAwaitingPassword {
                mode: ScanMode::Idle
            })
        );
        assert!(stitcher.begin_password_recovery().is_err());
    }

    #[tokio::test]
    async fn test_passphrase_flow_through_worker() {
        let (handle, join, publisher) = spawn(banana_oracle());

        for share in SHARES {
            handle.ingest(share).await.unwrap();
        }
        assert_eq!(handle.progress().progress.mode, ScanMode::AwaitingPassword);
        assert_eq!(
            handle.ingest("share-a").await.unwrap(),
            Some(IngestOutcome::Ignored(ScanMode::AwaitingPassword))
        );

        handle.finish_password_recovery(true).await.unwrap();
        handle.shutdown().await.unwrap();
        join.await.unwrap();

        let kinds = publisher.kinds();
        assert!(kinds
            .iter()
            .any(|kind| matches!(kind, ScanEventKind::PasswordRequired(_))));
        assert!(matches!(
            kinds.last(),
            Some(ScanEventKind::Decoded(DecodedPayload::BananaSplitRecovery(_)))
        ));
        assert_eq!(handle.progress().progress.mode, ScanMode::Completed);
    }

    // =============================================================================
    // RESET RACES
    // =============================================================================

    #[tokio::test]
    async fn test_slow_decode_superseded_by_reset() {
        let oracle = ScriptedOracle::new()
            .with_sequence(&["A", "B"])
            .with_total("C", 1)
            .with_decode_delay(Duration::from_millis(50));
        let (handle, join, publisher) = spawn(oracle);

        handle.submit_frame("A").await.unwrap();
        handle.submit_frame("B").await.unwrap();
        let epoch = handle.reset();
        let outcome = handle.ingest("C").await.unwrap();

        assert_eq!(
            outcome,
            Some(IngestOutcome::Decoded(DecodedPayload::Transaction("C".into())))
        );
        handle.shutdown().await.unwrap();
        join.await.unwrap();

        let decoded: Vec<_> = publisher
            .events()
            .into_iter()
            .filter(|event| matches!(event.kind, ScanEventKind::Decoded(_)))
            .collect();
        assert!(decoded.iter().all(|event| event.epoch == epoch));
        assert_eq!(decoded.len(), 1);
    }

    #[tokio::test]
    async fn test_progress_stream_epochs_never_go_back() {
        let oracle = ScriptedOracle::new().with_sequence(&["A", "B", "C"]);
        let (handle, join, _publisher) = spawn(oracle);
        let mut progress = handle.subscribe_progress();

        let watcher = tokio::spawn(async move {
            let mut seen = vec![progress.borrow_and_update().clone()];
            while progress.changed().await.is_ok() {
                seen.push(progress.borrow_and_update().clone());
            }
            seen
        });

        handle.submit_frame("A").await.unwrap();
        handle.reset();
        handle.submit_frame("B").await.unwrap();
        handle.reset();
        handle.ingest("C").await.unwrap();
        handle.shutdown().await.unwrap();
        join.await.unwrap();
        drop(handle);

        let seen: Vec<ScanSnapshot> = timeout(Duration::from_secs(5), watcher)
            .await
            .expect("watcher did not finish")
            .unwrap();
        assert!(seen.windows(2).all(|pair| pair[0].epoch <= pair[1].epoch));
        assert_eq!(seen.last().map(|snapshot| snapshot.epoch), Some(2));
    }
}
