/*
[INPUT]:  Orchestrator actions on an in-memory ledger with virtual time
[OUTPUT]: Test results for create/complete flows, metrics and invariants
[POS]:    Integration tests - task lifecycle and stake ledger
[UPDATE]: When task actions or completion semantics change
*/

mod common;

use std::time::Duration;

use common::{COMPLETION_LATENCY, connected_orchestrator, test_config};
use stake_ledger::{
    LedgerError, LedgerMetrics, Orchestrator, Task, TaskId, TaskStatus, to_display_units,
};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

fn assert_ledger_invariants(tasks: &[Task]) {
    for task in tasks {
        assert_eq!(
            task.completed_at.is_some(),
            task.status == TaskStatus::Completed,
            "{task:?}"
        );
        if let Some(completed_at) = task.completed_at {
            assert!(completed_at >= task.created_at, "{task:?}");
        }
    }

    let metrics = LedgerMetrics::from_tasks(tasks);
    assert_eq!(metrics.completed_count + metrics.pending_count, metrics.total_count);
    assert_eq!(
        metrics.total_stake,
        tasks.iter().map(|task| task.stake_amount).sum::<u128>()
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_converts_stake_to_base_units() {
    let orchestrator = connected_orchestrator().await;

    let task = assert_ok!(orchestrator.create_task("Audit", "Review the vault", "1.5"));

    assert_eq!(task.stake_amount, 1_500_000_000_000_000_000);
    assert_eq!(to_display_units(task.stake_amount), "1.500");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(orchestrator.list_tasks(), vec![task]);
}

#[tokio::test(start_paused = true)]
async fn test_complete_while_disconnected_is_unauthorized() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Audit", "Review", "1"));
    orchestrator.disconnect();
    let before = orchestrator.list_tasks();

    let err = assert_err!(orchestrator.complete_task(task.id).await);
    assert_eq!(err, LedgerError::Unauthorized);

    let err = assert_err!(orchestrator.complete_task(TaskId(999)).await);
    assert_eq!(err, LedgerError::Unauthorized);

    assert_eq!(orchestrator.list_tasks(), before);
    assert!(!orchestrator.is_completing(task.id));
}

#[tokio::test(start_paused = true)]
async fn test_complete_after_latency_updates_metrics() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship to testnet", "0.5"));
    let before = orchestrator.metrics();

    let started = Instant::now();
    let done = assert_ok!(orchestrator.complete_task(task.id).await);

    assert!(started.elapsed() >= COMPLETION_LATENCY);
    assert_eq!(done.status, TaskStatus::Completed);
    assert!(done.completed_at.is_some());
    assert_eq!(orchestrator.get_task(task.id), Some(done));

    let after = orchestrator.metrics();
    assert_eq!(after.completed_count, before.completed_count + 1);
    assert_eq!(after.pending_count, before.pending_count - 1);
    assert_eq!(after.total_stake, before.total_stake);
    assert_ledger_invariants(&orchestrator.list_tasks());
}

#[tokio::test(start_paused = true)]
async fn test_blank_name_is_rejected_without_side_effects() {
    let orchestrator = Orchestrator::from_config(&test_config());

    let err = assert_err!(orchestrator.create_task("", "desc", "1.0"));
    assert!(matches!(err, LedgerError::Validation(_)));

    assert_ok!(orchestrator.connect().await);
    let err = assert_err!(orchestrator.create_task("   ", "desc", "1.0"));
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(orchestrator.list_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_create_requires_connected_session() {
    let orchestrator = Orchestrator::from_config(&test_config());
    let err = assert_err!(orchestrator.create_task("Audit", "Review", "1"));
    assert_eq!(err, LedgerError::Unauthorized);
    assert!(orchestrator.list_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_stake_is_invalid_amount() {
    let orchestrator = connected_orchestrator().await;
    for input in ["abc", "-1", "ten"] {
        let err = assert_err!(orchestrator.create_task("Audit", "Review", input));
        assert!(matches!(err, LedgerError::InvalidAmount { .. }), "{input}: {err:?}");
    }
    assert!(orchestrator.list_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_completion_of_same_task_finalizes_once() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship", "1"));

    let (first, second) = tokio::join!(
        orchestrator.complete_task(task.id),
        orchestrator.complete_task(task.id)
    );

    let results = [first, second];
    let completed: Vec<&Task> = results.iter().filter_map(|res| res.as_ref().ok()).collect();
    assert_eq!(completed.len(), 1);
    assert!(results.iter().any(|res| matches!(
        res,
        Err(LedgerError::InvalidState { id, .. }) if *id == task.id
    )));
    assert_eq!(orchestrator.metrics().completed_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_completing_a_completed_task_is_invalid_state() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship", "1"));
    let done = assert_ok!(orchestrator.complete_task(task.id).await);

    let err = assert_err!(orchestrator.complete_task(task.id).await);
    assert!(err.is_noop());
    assert_eq!(orchestrator.get_task(task.id), Some(done));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_task_is_not_found() {
    let orchestrator = connected_orchestrator().await;
    let err = assert_err!(orchestrator.complete_task(TaskId(42)).await);
    assert_eq!(err, LedgerError::NotFound(TaskId(42)));
}

#[tokio::test(start_paused = true)]
async fn test_completions_on_distinct_tasks_overlap() {
    let orchestrator = connected_orchestrator().await;
    let a = assert_ok!(orchestrator.create_task("A", "first", "1"));
    let b = assert_ok!(orchestrator.create_task("B", "second", "2"));

    let started = Instant::now();
    let (done_a, done_b) = tokio::join!(
        orchestrator.complete_task(a.id),
        orchestrator.complete_task(b.id)
    );

    assert_eq!(assert_ok!(done_a).status, TaskStatus::Completed);
    assert_eq!(assert_ok!(done_b).status, TaskStatus::Completed);
    assert!(started.elapsed() < COMPLETION_LATENCY * 2);
    assert_ledger_invariants(&orchestrator.list_tasks());
}

#[tokio::test(start_paused = true)]
async fn test_in_progress_marker_is_visible_during_latency() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship", "1"));
    let mut rx = orchestrator.subscribe();

    let worker = orchestrator.clone();
    let id = task.id;
    let handle = tokio::spawn(async move { worker.complete_task(id).await });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(orchestrator.is_completing(task.id));
    assert_eq!(
        orchestrator.get_task(task.id).map(|task| task.status),
        Some(TaskStatus::Pending)
    );
    assert!(rx.borrow_and_update().in_progress.contains(&task.id));
    assert_ledger_invariants(&orchestrator.list_tasks());

    assert_ok!(assert_ok!(handle.await));
    assert!(!orchestrator.is_completing(task.id));
    assert!(rx.has_changed().unwrap_or(false));
    assert!(rx.borrow_and_update().in_progress.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_completion_finalizes_after_disconnect() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship", "1"));

    let worker = orchestrator.clone();
    let id = task.id;
    let handle = tokio::spawn(async move { worker.complete_task(id).await });
    tokio::time::sleep(Duration::from_secs(1)).await;
    orchestrator.disconnect();

    let done = assert_ok!(assert_ok!(handle.await));
    assert_eq!(done.status, TaskStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_completion_survives_dropped_caller() {
    let orchestrator = connected_orchestrator().await;
    let task = assert_ok!(orchestrator.create_task("Deploy", "Ship", "1"));

    let timed_out =
        tokio::time::timeout(Duration::from_secs(1), orchestrator.complete_task(task.id)).await;
    assert!(timed_out.is_err());
    assert!(orchestrator.is_completing(task.id));

    tokio::time::sleep(COMPLETION_LATENCY).await;
    let settled = orchestrator.get_task(task.id).expect("task exists");
    assert_eq!(settled.status, TaskStatus::Completed);
    assert!(!orchestrator.is_completing(task.id));
}

#[tokio::test(start_paused = true)]
async fn test_ids_are_unique_under_rapid_creation() {
    let orchestrator = connected_orchestrator().await;
    let ids: Vec<TaskId> = (0..100)
        .map(|n| {
            orchestrator
                .create_task(&format!("task {n}"), "bulk", "0.001")
                .map(|task| task.id)
        })
        .collect::<Result<_, _>>()
        .expect("bulk create");

    let mut unique = ids.clone();
    unique.dedup();
    assert_eq!(unique.len(), 100);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(orchestrator.metrics().total_stake, 100_000_000_000_000_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_published_snapshot_settles_on_latest_state() {
    let mut config = test_config();
    config.session.connect_latency_ms = 0;
    config.ledger.completion_latency_ms = 0;

    for _ in 0..50 {
        let orchestrator = Orchestrator::from_config(&config);
        let rx = orchestrator.subscribe();
        assert_ok!(orchestrator.connect().await);

        let workers: Vec<_> = (0..16)
            .map(|n| {
                let worker = orchestrator.clone();
                tokio::spawn(async move {
                    let task = worker.create_task(&format!("task {n}"), "parallel", "0.1")?;
                    worker.complete_task(task.id).await
                })
            })
            .collect();
        for worker in workers {
            assert_ok!(worker.await.expect("worker panicked"));
        }

        let published = rx.borrow().clone();
        assert_eq!(published, orchestrator.snapshot());
        assert_eq!(published.metrics.completed_count, 16);
        assert!(published.in_progress.is_empty());
    }
}
