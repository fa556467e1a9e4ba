mod common;

use common::{RecordingGateway, TestSink};
use liker_engine::{
    BatchFailure, BatchMutationEngine, BatchOutcome, BatchSource, CancellationToken, EngineEvent,
    FailureKind,
};
use pretty_assertions::assert_eq;

fn progress_of(events: &[EngineEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::BatchProgress(progress) => Some(progress.items_processed),
            _ => None,
        })
        .collect()
}

#[test]
fn chunks_cover_sequence_in_order() {
    let engine = BatchMutationEngine::new(3);
    for total in [0usize, 1, 2, 3, 4, 7, 9, 10] {
        let ids: Vec<i64> = (0..total as i64).collect();
        let chunks: Vec<&[i64]> = engine.chunks(&ids).collect();

        assert_eq!(chunks.len(), total.div_ceil(3), "total {total}");
        assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= 3));
        assert_eq!(chunks.concat(), ids);
    }
}

#[test]
fn zero_batch_size_falls_back_to_one() {
    assert_eq!(BatchMutationEngine::new(0).batch_size(), 1);
}

#[tokio::test]
async fn whole_collection_is_resolved_then_sent_in_three_chunks() {
    liker_logging::initialize_for_tests();
    let gateway = RecordingGateway::with_ids(1..=2500);
    let sink = TestSink::default();
    let engine = BatchMutationEngine::default();

    let outcome = engine
        .run(
            &gateway,
            1,
            BatchSource::AllInCollection("fintech".to_string()),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect("batch ok");

    assert_eq!(
        outcome,
        BatchOutcome::Completed {
            items_applied: 2500
        }
    );
    assert_eq!(gateway.chunk_sizes(), vec![1000, 1000, 500]);
    assert_eq!(gateway.chunks().concat(), (1..=2500).collect::<Vec<i64>>());
    assert_eq!(
        gateway.other_calls(),
        vec!["read_all_identifiers fintech".to_string()]
    );

    let events = sink.take();
    assert_eq!(
        events.first(),
        Some(&EngineEvent::BatchResolved {
            job_id: 1,
            total_items: 2500
        })
    );
    let processed = progress_of(&events);
    assert_eq!(processed, vec![1000, 2000, 2500]);
    let percents: Vec<f64> = processed
        .iter()
        .map(|done| (*done as f64 / 2500.0 * 100.0).min(100.0))
        .collect();
    assert_eq!(percents, vec![40.0, 80.0, 100.0]);
}

#[tokio::test]
async fn explicit_ids_skip_resolution_and_fit_one_chunk() {
    let gateway = RecordingGateway::default();
    let sink = TestSink::default();

    let outcome = BatchMutationEngine::new(1000)
        .run(
            &gateway,
            4,
            BatchSource::Ids(vec![3, 7, 9]),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect("batch ok");

    assert_eq!(outcome, BatchOutcome::Completed { items_applied: 3 });
    assert_eq!(gateway.chunks(), vec![vec![3, 7, 9]]);
    assert!(gateway.other_calls().is_empty());
}

#[tokio::test]
async fn empty_input_makes_no_calls() {
    let gateway = RecordingGateway::default();
    let sink = TestSink::default();

    let outcome = BatchMutationEngine::default()
        .apply(&gateway, 2, &[], &sink, &CancellationToken::new())
        .await
        .expect("batch ok");

    assert_eq!(outcome, BatchOutcome::Completed { items_applied: 0 });
    assert!(gateway.chunks().is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn failing_chunk_stops_the_run() {
    liker_logging::initialize_for_tests();
    let gateway = RecordingGateway {
        fail_on_chunk: Some(2),
        ..RecordingGateway::default()
    };
    let sink = TestSink::default();
    let ids: Vec<i64> = (1..=2500).collect();

    let err = BatchMutationEngine::default()
        .apply(&gateway, 3, &ids, &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        BatchFailure::Chunk {
            chunk_index,
            items_applied,
            items_not_applied,
            error,
        } => {
            assert_eq!(chunk_index, 1);
            assert_eq!(items_applied, 1000);
            assert_eq!(items_not_applied, 1500);
            assert_eq!(error.kind, FailureKind::HttpStatus(502));
        }
        other => panic!("expected chunk failure, got {other:?}"),
    }
    // The third chunk is never sent.
    assert_eq!(gateway.chunk_sizes(), vec![1000, 1000]);
    assert_eq!(progress_of(&sink.take()), vec![1000]);
}

#[tokio::test]
async fn failed_resolution_sends_nothing() {
    let gateway = RecordingGateway {
        fail_resolution: true,
        ..RecordingGateway::with_ids(1..=10)
    };
    let sink = TestSink::default();

    let err = BatchMutationEngine::default()
        .run(
            &gateway,
            5,
            BatchSource::AllInCollection("fintech".to_string()),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BatchFailure::Resolution(ref e) if e.kind == FailureKind::Network));
    assert!(gateway.chunks().is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn cancellation_is_honoured_between_chunks() {
    let token = CancellationToken::new();
    let gateway = RecordingGateway {
        cancel_after: Some((1, token.clone())),
        ..RecordingGateway::default()
    };
    let sink = TestSink::default();
    let ids: Vec<i64> = (1..=25).collect();

    let outcome = BatchMutationEngine::new(10)
        .apply(&gateway, 6, &ids, &sink, &token)
        .await
        .expect("cancel is not a failure");

    assert_eq!(
        outcome,
        BatchOutcome::Cancelled {
            items_applied: 10,
            items_not_applied: 15
        }
    );
    assert_eq!(gateway.chunk_sizes(), vec![10]);
}

#[tokio::test]
async fn progress_is_monotonic_and_bounded() {
    let gateway = RecordingGateway::default();
    let sink = TestSink::default();
    let ids: Vec<i64> = (1..=23).collect();

    BatchMutationEngine::new(5)
        .apply(&gateway, 7, &ids, &sink, &CancellationToken::new())
        .await
        .expect("batch ok");

    let processed = progress_of(&sink.take());
    assert_eq!(processed, vec![5, 10, 15, 20, 23]);
    assert!(processed.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(processed.iter().all(|done| *done <= ids.len()));
}
