//! # Codec Pipeline Tests
//!
//! Raw scanner lines go through the real QR codec, the stitcher state
//! machine and the background worker.
//!
//! ## Flow Tested:
//!
//! 1. **Header stripping**: byte-mode header removed before frame parsing
//! 2. **Legacy multipart**: totals from the first frame drive accumulation
//! 3. **Banana split shares**: completion asks for a passphrase
//! 4. **Fountain packets**: raptorq frames decode once enough packets arrive
//! 5. **Rejection paths**: malformed frames never start a session

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use vs_01_qr_codec::CodecConfig;
    use vs_02_frame_stitcher::test_utils::RecordingPublisher;
    use vs_02_frame_stitcher::{
        CodecOracle, DecodedPayload, FrameIngestApi, FrameStitcher, IngestOutcome, ScanError,
        ScanEventKind, ScanMode, ScanProgress, ScanSnapshot, SecretPassword, StitcherConfig,
        StitcherWorker,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn wrap(bytes: &[u8]) -> String {
        format!("4{:04x}{}", bytes.len(), hex::encode(bytes))
    }

    fn legacy_bytes(total: u16, index: u16, data: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00];
        bytes.extend_from_slice(&total.to_be_bytes());
        bytes.extend_from_slice(&index.to_be_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    fn legacy_line(total: u16, index: u16, data: &[u8]) -> String {
        wrap(&legacy_bytes(total, index, data))
    }

    fn share_line(data: &str) -> String {
        wrap(format!(r#"{{"v":1,"t":"cold storage","r":2,"d":"{data}","n":"bm9uY2U="}}"#).as_bytes())
    }

    fn fountain_lines(data: &[u8], symbol_len: u16, repair_packets: u32) -> Vec<String> {
        let encoder = raptorq::Encoder::with_defaults(data, symbol_len);
        let header = (data.len() as u32 | 0x8000_0000).to_be_bytes();
        encoder
            .get_encoded_packets(repair_packets)
            .iter()
            .map(|packet| {
                let mut bytes = header.to_vec();
                bytes.extend_from_slice(&packet.serialize());
                wrap(&bytes)
            })
            .collect()
    }

    fn transaction_bytes(len: usize) -> Vec<u8> {
        let mut data: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
        data[..3].copy_from_slice(&[0x53, 0x01, 0x02]);
        data
    }

    fn stitcher(cleaned: bool) -> FrameStitcher<CodecOracle> {
        FrameStitcher::new(
            Arc::new(CodecOracle::new(CodecConfig { cleaned })),
            StitcherConfig::default(),
        )
    }

    // =============================================================================
    // LEGACY MULTIPART
    // =============================================================================

    #[test]
    fn test_legacy_frames_in_any_order_decode() {
        let mut stitcher = stitcher(false);
        let frames = [
            legacy_line(3, 2, &[0x03]),
            legacy_line(3, 0, &[0x53, 0x01]),
            legacy_line(3, 1, &[0x02]),
        ];

        assert_eq!(
            stitcher.on_frame_decoded(&frames[0]),
            IngestOutcome::Progress(ScanProgress {
                captured: 1,
                total: Some(3),
                mode: ScanMode::Accumulating,
            })
        );
        assert_eq!(stitcher.on_frame_decoded(&frames[0]), IngestOutcome::Duplicate);
        assert!(matches!(
            stitcher.on_frame_decoded(&frames[1]),
            IngestOutcome::Progress(ScanProgress { captured: 2, .. })
        ));
        assert_eq!(
            stitcher.on_frame_decoded(&frames[2]),
            IngestOutcome::Decoded(DecodedPayload::Transaction("53010203".into()))
        );
        assert_eq!(stitcher.session().mode(), ScanMode::Completed);
    }

    #[test]
    fn test_cleaned_lines_skip_header() {
        let mut stitcher = stitcher(true);
        let first = hex::encode(legacy_bytes(2, 0, &[0x53, 0xff]));
        let second = hex::encode(legacy_bytes(2, 1, &[0xdf, 0x00]));

        stitcher.on_frame_decoded(&first);
        assert_eq!(
            stitcher.on_frame_decoded(&second),
            IngestOutcome::Decoded(DecodedPayload::DynamicDerivations("53ffdf00".into()))
        );
    }

    #[test]
    fn test_static_frame_inside_legacy_sequence_fails_decode() {
        let mut stitcher = stitcher(false);

        stitcher.on_frame_decoded(&legacy_line(2, 0, &[0x53]));
        let outcome = stitcher.on_frame_decoded(&wrap(&[0x53, 0x01]));

        assert!(matches!(
            outcome,
            IngestOutcome::DecodeFailed(ScanError::DecodeFailure { .. })
        ));
        assert_eq!(stitcher.session().mode(), ScanMode::Idle);
        assert_eq!(stitcher.session().captured(), 0);
    }

    #[test]
    fn test_single_part_legacy_frame_decodes_at_once() {
        let mut stitcher = stitcher(false);
        assert_eq!(
            stitcher.on_frame_decoded(&legacy_line(1, 0, &[0x53, 0x01, 0x02])),
            IngestOutcome::Decoded(DecodedPayload::Transaction("530102".into()))
        );
    }

    // =============================================================================
    // FOUNTAIN
    // =============================================================================

    #[test]
    fn test_fountain_packets_decode_through_stitcher() {
        let data = transaction_bytes(300);
        let lines = fountain_lines(&data, 64, 0);
        let mut stitcher = stitcher(false);

        assert_eq!(
            stitcher.on_frame_decoded(&lines[4]),
            IngestOutcome::Progress(ScanProgress {
                captured: 1,
                total: Some(5),
                mode: ScanMode::Accumulating,
            })
        );
        assert_eq!(stitcher.on_frame_decoded(&lines[4]), IngestOutcome::Duplicate);
        for line in &lines[..3] {
            assert!(matches!(
                stitcher.on_frame_decoded(line),
                IngestOutcome::Progress(_)
            ));
        }
        assert_eq!(
            stitcher.on_frame_decoded(&lines[3]),
            IngestOutcome::Decoded(DecodedPayload::Transaction(hex::encode(&data)))
        );
    }

    #[test]
    fn test_fountain_estimate_includes_repair_packet() {
        let data = transaction_bytes(256);
        let lines = fountain_lines(&data, 64, 1);
        assert_eq!(lines.len(), 5);
        let mut stitcher = stitcher(false);

        let mut last = None;
        for line in &lines {
            last = Some(stitcher.on_frame_decoded(line));
        }
        assert_eq!(
            last,
            Some(IngestOutcome::Decoded(DecodedPayload::Transaction(
                hex::encode(&data)
            )))
        );
    }

    #[test]
    fn test_legacy_frame_inside_fountain_sequence_fails_decode() {
        let lines = fountain_lines(&transaction_bytes(100), 64, 0);
        let mut stitcher = stitcher(false);

        assert!(matches!(
            stitcher.on_frame_decoded(&lines[0]),
            IngestOutcome::Progress(ScanProgress { total: Some(2), .. })
        ));
        assert!(matches!(
            stitcher.on_frame_decoded(&legacy_line(2, 0, &[0x53])),
            IngestOutcome::DecodeFailed(ScanError::DecodeFailure { .. })
        ));
        assert_eq!(stitcher.session().mode(), ScanMode::Idle);
    }

    // =============================================================================
    // REJECTION PATHS
    // =============================================================================

    #[test]
    fn test_zero_total_legacy_frame_is_rejected() {
        let mut stitcher = stitcher(false);
        assert!(matches!(
            stitcher.on_frame_decoded(&legacy_line(0, 0, &[0x53])),
            IngestOutcome::Rejected(ScanError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn test_bad_header_then_good_frame() {
        let mut stitcher = stitcher(false);

        assert!(matches!(
            stitcher.on_frame_decoded("zz"),
            IngestOutcome::Rejected(_)
        ));
        assert!(matches!(
            stitcher.on_frame_decoded(&wrap(&[0x53, 0x01])),
            IngestOutcome::Decoded(_)
        ));
    }

    // =============================================================================
    // BANANA SPLIT
    // =============================================================================

    #[test]
    fn test_banana_split_shares_request_passphrase() {
        let mut stitcher = stitcher(false);
        let first = share_line("QUFB");
        let second = share_line("QkJC");

        assert!(matches!(
            stitcher.on_frame_decoded(&first),
            IngestOutcome::Progress(ScanProgress { total: Some(2), .. })
        ));
        match stitcher.on_frame_decoded(&second) {
            IngestOutcome::PasswordRequired(shares) => {
                assert_eq!(shares.frames(), [first, second]);
            }
            other => panic!("expected passphrase request, got {other:?}"),
        }
        assert_eq!(stitcher.session().mode(), ScanMode::AwaitingPassword);
        assert_eq!(
            stitcher.on_frame_decoded(&share_line("Q0ND")),
            IngestOutcome::Ignored(ScanMode::AwaitingPassword)
        );
    }

    #[test]
    fn test_codec_oracle_cannot_recover_seed() {
        let mut stitcher = stitcher(false);
        stitcher.on_frame_decoded(&share_line("QUFB"));
        stitcher.on_frame_decoded(&share_line("QkJC"));

        let mut recovery = stitcher.begin_password_recovery().unwrap();
        let err = recovery
            .attempt(&SecretPassword::new("hunter2"))
            .unwrap_err();
        assert!(matches!(err, ScanError::DecodeFailure { .. }));
        assert_eq!(
            recovery.attempt(&SecretPassword::new("hunter2")),
            Err(ScanError::RecoveryClosed)
        );
    }

    // =============================================================================
    // THROUGH THE WORKER
    // =============================================================================

    #[tokio::test]
    async fn test_worker_decodes_real_frames() {
        let oracle = Arc::new(CodecOracle::new(CodecConfig::default()));
        let publisher = Arc::new(RecordingPublisher::new());
        let stitcher = FrameStitcher::new(oracle, StitcherConfig::default());
        let (handle, join) = StitcherWorker::spawn(stitcher, Arc::clone(&publisher));

        let outcome = handle.ingest(legacy_line(2, 1, &[0x02])).await.unwrap();
        assert!(matches!(outcome, Some(IngestOutcome::Progress(_))));
        assert_eq!(handle.progress().progress.captured, 1);

        let outcome = handle.ingest(legacy_line(2, 0, &[0x53])).await.unwrap();
        assert_eq!(
            outcome,
            Some(IngestOutcome::Decoded(DecodedPayload::Transaction(
                "5302".into()
            )))
        );

        assert_eq!(handle.reset(), 1);
        assert_eq!(handle.progress(), ScanSnapshot::idle(1));

        handle.shutdown().await.unwrap();
        join.await.unwrap();

        let kinds = publisher.kinds();
        assert!(matches!(kinds[0], ScanEventKind::Progress(_)));
        assert_eq!(
            kinds[1],
            ScanEventKind::Decoded(DecodedPayload::Transaction("5302".into()))
        );
        assert_eq!(kinds.last(), Some(&ScanEventKind::Reset));
    }

    // =============================================================================
    // PROPERTY TESTS
    // =============================================================================

    proptest! {
        #[test]
        fn prop_scan_order_never_changes_payload(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 2..6)
                .prop_flat_map(|chunks| {
                    let order: Vec<usize> = (0..chunks.len()).collect();
                    (Just(chunks), Just(order).prop_shuffle())
                }),
        ) {
            let (chunks, order) = chunks;
            let total = chunks.len() as u16;
            let expected: Vec<u8> = chunks.concat();

            let mut stitcher = stitcher(false);
            let mut last = None;
            for index in order {
                last = Some(stitcher.on_frame_decoded(&legacy_line(
                    total,
                    index as u16,
                    &chunks[index],
                )));
            }

            let decoded = match last {
                Some(IngestOutcome::Decoded(payload)) => payload,
                other => panic!("expected decoded payload, got {other:?}"),
            };
            prop_assert_eq!(decoded.payload(), vec![hex::encode(expected)]);
        }
    }
}
