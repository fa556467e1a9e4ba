mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::RecordingGateway;
use liker_engine::{
    BatchFailure, BatchOutcome, BatchSource, EngineEvent, EngineHandle, Mutation, PageQuery,
};

fn collect_until_finished(engine: &EngineHandle, job_id: u64) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            let finished =
                matches!(&event, EngineEvent::BatchFinished { job_id: id, .. } if *id == job_id);
            events.push(event);
            if finished {
                return events;
            }
        }
    }
    panic!("job {job_id} did not finish, saw {events:?}");
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn batch_run_reports_resolution_progress_and_completion() {
    liker_logging::initialize_for_tests();
    let gateway = Arc::new(RecordingGateway::with_ids(1..=25));
    let engine = EngineHandle::with_gateway(gateway.clone());

    engine.run_batch(
        1,
        BatchSource::AllInCollection("fintech".to_string()),
        10,
    );
    let events = collect_until_finished(&engine, 1);

    assert_eq!(
        events.first(),
        Some(&EngineEvent::BatchResolved {
            job_id: 1,
            total_items: 25
        })
    );
    let progress: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::BatchProgress(p) => Some(p.items_processed),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![10, 20, 25]);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::BatchFinished {
            job_id: 1,
            result: Ok(BatchOutcome::Completed { items_applied: 25 }),
        })
    );
    assert_eq!(gateway.chunk_sizes(), vec![10, 10, 5]);
}

#[test]
fn failed_chunk_is_reported_as_partial() {
    let gateway = Arc::new(RecordingGateway {
        fail_on_chunk: Some(2),
        ..RecordingGateway::default()
    });
    let engine = EngineHandle::with_gateway(gateway.clone());

    engine.run_batch(9, BatchSource::Ids((1..=30).collect()), 10);
    let events = collect_until_finished(&engine, 9);

    match events.last() {
        Some(EngineEvent::BatchFinished {
            result:
                Err(BatchFailure::Chunk {
                    chunk_index,
                    items_applied,
                    items_not_applied,
                    ..
                }),
            ..
        }) => {
            assert_eq!(*chunk_index, 1);
            assert_eq!(*items_applied, 10);
            assert_eq!(*items_not_applied, 20);
        }
        other => panic!("expected partial failure, got {other:?}"),
    }
    assert_eq!(gateway.chunk_sizes(), vec![10, 10]);
}

#[test]
fn cancel_stops_run_between_chunks() {
    let gateway = Arc::new(RecordingGateway::default());
    let engine = EngineHandle::with_gateway(gateway.clone());

    engine.run_batch(3, BatchSource::Ids(vec![1, 2, 3]), 1);
    engine.cancel_batch(3);
    let events = collect_until_finished(&engine, 3);

    let finished = events.last().expect("finished event");
    let EngineEvent::BatchFinished { result, .. } = finished else {
        panic!("unexpected event {finished:?}");
    };
    // The worker may have sent chunks before the cancel landed.
    match result {
        Ok(BatchOutcome::Cancelled {
            items_applied,
            items_not_applied,
        }) => {
            assert_eq!(items_applied + items_not_applied, 3);
            assert_eq!(gateway.chunks().len(), *items_applied);
        }
        Ok(BatchOutcome::Completed { items_applied }) => assert_eq!(*items_applied, 3),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn reads_and_mutations_are_forwarded() {
    let gateway = Arc::new(RecordingGateway::with_ids(1..=3));
    let engine = EngineHandle::with_gateway(gateway.clone());

    engine.fetch_page(PageQuery {
        collection_id: "fintech".to_string(),
        offset: 100,
        limit: 50,
    });
    match next_event(&engine) {
        EngineEvent::PageLoaded { query, result } => {
            assert_eq!(query.offset, 100);
            assert_eq!(result.expect("page").total, 3);
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.mutate(Mutation::LikeMany(vec![3, 7, 9]));
    assert_eq!(
        next_event(&engine),
        EngineEvent::MutationCompleted {
            mutation: Mutation::LikeMany(vec![3, 7, 9]),
            result: Ok(()),
        }
    );
    assert_eq!(
        gateway.other_calls(),
        vec![
            "read_collection fintech 100 50".to_string(),
            "like_many 3".to_string()
        ]
    );
    assert!(gateway.chunks().is_empty());
}
