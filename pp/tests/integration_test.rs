//! Integration tests for pingpong
//!
//! These tests drive the play through the public API only.

use std::sync::Arc;
use std::time::Duration;

use pingpong::play::{StartupBarrier, WorkerLoop, mailbox};
use pingpong::{Coordinator, DONE_BANNER, MemorySink, OutputSink, PlayConfig, PlayError, READY_BANNER, Role};
use proptest::prelude::*;

fn expected_lines(n: u32) -> Vec<String> {
    let mut lines = vec![READY_BANNER.to_string()];
    for i in 1..=n {
        lines.push(format!("PING({})", i));
        lines.push(format!("PONG({})", i));
    }
    lines.push(DONE_BANNER.to_string());
    lines
}

// =============================================================================
// Coordinator Tests
// =============================================================================

#[tokio::test]
async fn test_three_rounds_alternate() {
    let sink = MemorySink::new();
    Coordinator::new(PlayConfig::with_max_iterations(3))
        .run(Arc::new(sink.clone()))
        .await
        .expect("play should finish");

    assert_eq!(
        sink.lines(),
        vec![
            "Ready...Set...Go!",
            "PING(1)",
            "PONG(1)",
            "PING(2)",
            "PONG(2)",
            "PING(3)",
            "PONG(3)",
            "Done!"
        ]
    );
}

#[tokio::test]
async fn test_single_round_boundary() {
    let sink = MemorySink::new();
    Coordinator::new(PlayConfig::with_max_iterations(1))
        .run(Arc::new(sink.clone()))
        .await
        .expect("play should finish");

    assert_eq!(sink.lines(), vec!["Ready...Set...Go!", "PING(1)", "PONG(1)", "Done!"]);
}

#[tokio::test]
async fn test_closure_sink_receives_every_line() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let sink: Arc<dyn OutputSink> = Arc::new(move |line: &str| {
        let _ = tx.send(line.to_string());
    });

    Coordinator::new(PlayConfig::with_max_iterations(2))
        .run(sink)
        .await
        .expect("play should finish");

    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    assert_eq!(lines, expected_lines(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_plays_do_not_interfere() {
    let mut games = Vec::new();
    for n in 1..=8u32 {
        games.push(tokio::spawn(async move {
            let sink = MemorySink::new();
            Coordinator::new(PlayConfig::with_max_iterations(n))
                .run(Arc::new(sink.clone()))
                .await
                .map(|_| (n, sink.lines()))
        }));
    }

    for game in games {
        let (n, lines) = tokio::time::timeout(Duration::from_secs(10), game)
            .await
            .expect("play should terminate")
            .expect("task should not panic")
            .expect("play should finish");
        assert_eq!(lines, expected_lines(n));
    }
}

#[tokio::test]
async fn test_zero_budget_is_rejected() {
    let sink = MemorySink::new();
    let err = Coordinator::new(PlayConfig::with_max_iterations(0))
        .run(Arc::new(sink.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<PlayError>(), Some(PlayError::InvalidConfig(_))));
    assert!(sink.is_empty(), "a rejected run must not print the banners");
}

// =============================================================================
// Worker Loop Tests
// =============================================================================

#[tokio::test]
async fn test_hand_wired_workers_match_coordinator() {
    let sink = MemorySink::new();
    let barrier = StartupBarrier::new(2);
    let (ping_mailbox, ping_inbox) = mailbox(Role::Ping, 1);
    let (pong_mailbox, pong_inbox) = mailbox(Role::Pong, 1);

    let ping = WorkerLoop::ping(
        4,
        ping_inbox,
        ping_mailbox,
        pong_mailbox,
        barrier.party(Role::Ping),
        Arc::new(sink.clone()),
    );
    let pong = WorkerLoop::pong(4, pong_inbox, barrier.party(Role::Pong), Arc::new(sink.clone()));

    let (ping_report, pong_report) = tokio::join!(tokio::spawn(ping.run()), tokio::spawn(pong.run()));
    let ping_report = ping_report.unwrap().unwrap();
    let pong_report = pong_report.unwrap().unwrap();

    assert_eq!(ping_report.rounds, 4);
    assert_eq!(pong_report.rounds, 4);
    assert_eq!(ping_report.undelivered + pong_report.undelivered, 0);
    assert_eq!(barrier.arrived(), 2);

    let expected = expected_lines(4);
    assert_eq!(sink.lines(), expected[1..expected.len() - 1].to_vec());
}

#[tokio::test]
async fn test_peer_lost_before_barrier_is_startup_failure() {
    let barrier = StartupBarrier::new(2);
    let (_pong_own, pong_inbox) = mailbox(Role::Pong, 1);
    let pong = WorkerLoop::pong(3, pong_inbox, barrier.party(Role::Pong), Arc::new(MemorySink::new()));

    // PING never gets built; its ticket is dropped unused
    drop(barrier.party(Role::Ping));

    let err = tokio::time::timeout(Duration::from_secs(5), pong.run())
        .await
        .expect("broken barrier should not hang")
        .unwrap_err();
    assert!(err.is_startup_failure());
    assert_eq!(err.role(), Some(Role::Pong));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_any_budget_alternates_and_terminates(n in 1u32..150) {
        let sink = MemorySink::new();
        Coordinator::new(PlayConfig::with_max_iterations(n))
            .run_blocking(Arc::new(sink.clone()))
            .expect("play should finish");

        prop_assert_eq!(sink.lines(), expected_lines(n));
    }

    #[test]
    fn prop_mailbox_capacity_does_not_change_order(n in 1u32..40, capacity in 1usize..16) {
        let sink = MemorySink::new();
        Coordinator::new(PlayConfig { max_iterations: n, mailbox_capacity: capacity })
            .run_blocking(Arc::new(sink.clone()))
            .expect("play should finish");

        prop_assert_eq!(sink.lines(), expected_lines(n));
    }
}
