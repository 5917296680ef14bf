//! Check/notify cadence of a task wrapper
//!
//! A condition that persists across evaluations may only surface once per
//! notify interval, however often the check runs.

mod common;

use chrono::Duration;
use common::fixtures::*;
use watcher::chain::ChainRole;
use watcher::tasks::{ChainStuck, Check, LowPeers, Task};

fn low_peers_task() -> Task {
    Task::new(
        "LowPeers",
        Duration::minutes(5),
        Duration::hours(1),
        Box::new(LowPeers::new(3)),
    )
}

#[tokio::test]
async fn test_persisting_condition_notifies_once_per_interval() {
    let chain = MockChain::new(ChainRole::Light);
    chain.update(|s| s.peers = 1);
    let mut task = low_peers_task();

    let mut emitted = Vec::new();
    for minute in (0..=120).step_by(5) {
        let now = at(minute);
        if !task.should_check_now(now) {
            continue;
        }
        if let Some(event) = task.evaluate(&chain, now).await.unwrap() {
            emitted.push(minute);
            assert_eq!(event.message, "low peer count: 1 (minimum 3)");
            assert_eq!(event.task, "LowPeers");
        }
    }

    // the first evaluation only records the baseline
    assert_eq!(emitted, vec![5, 65]);
    assert_eq!(task.last_notified(), Some(at(65)));
}

#[tokio::test]
async fn test_check_interval_gates_evaluation() {
    let mut task = low_peers_task();

    assert!(task.should_check_now(at(0)));
    assert!(!task.should_check_now(at(1)));
    assert!(!task.should_check_now(at(4)));
    assert!(task.should_check_now(at(5)));
    assert_eq!(task.last_checked(), Some(at(5)));
}

#[tokio::test]
async fn test_suppressed_alert_does_not_move_last_notified() {
    let chain = MockChain::new(ChainRole::Full);
    chain.update(|s| s.peers = 0);
    let mut task = low_peers_task();

    assert!(task.evaluate(&chain, at(0)).await.unwrap().is_none());
    assert!(task.evaluate(&chain, at(1)).await.unwrap().is_some());
    assert!(task.evaluate(&chain, at(30)).await.unwrap().is_none());
    assert_eq!(task.last_notified(), Some(at(1)));
    assert!(task.evaluate(&chain, at(60)).await.unwrap().is_none());
    assert!(task.evaluate(&chain, at(61)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_chain_error_leaves_task_untouched() {
    let chain = MockChain::new(ChainRole::Light);
    chain.update(|s| s.failing = true);
    let mut task = low_peers_task();

    assert!(task.evaluate(&chain, at(0)).await.is_err());
    assert_eq!(task.last_notified(), None);

    chain.update(|s| {
        s.failing = false;
        s.peers = 1;
    });
    assert!(task.evaluate(&chain, at(1)).await.unwrap().is_none());
    assert!(task.evaluate(&chain, at(2)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_low_peers_first_evaluation_is_baseline() {
    let chain = MockChain::new(ChainRole::Bridge);
    chain.update(|s| s.peers = 0);
    let mut check = LowPeers::new(3);

    assert!(check.run(&chain, at(0)).await.unwrap().is_none());
    assert_eq!(check.baseline(), Some(0));

    let alert = check.run(&chain, at(5)).await.unwrap().unwrap();
    assert!(!alert.recovery);
}

#[tokio::test]
async fn test_stuck_chain_recovery_is_sent_inside_throttle_window() {
    let chain = MockChain::new(ChainRole::Light);
    let mut task = Task::new(
        "ChainStuck",
        Duration::minutes(1),
        Duration::minutes(15),
        Box::new(ChainStuck::new(Duration::minutes(5))),
    );

    assert!(task.evaluate(&chain, at(0)).await.unwrap().is_none());

    let stuck = task.evaluate(&chain, at(5)).await.unwrap().unwrap();
    assert_eq!(stuck.message, "chain is stuck at block hash HASH1000 since 5m");
    assert_eq!(task.last_notified(), Some(at(5)));

    // still stuck, throttled
    assert!(task.evaluate(&chain, at(6)).await.unwrap().is_none());

    chain.update(|s| s.block_hash = "HASH1001".to_string());
    let recovered = task.evaluate(&chain, at(7)).await.unwrap().unwrap();
    assert_eq!(recovered.message, "chain is no longer stuck (after 7m)");
    assert_eq!(recovered.task, "ChainStuck");
    assert_eq!(task.last_notified(), Some(at(5)));

    assert!(task.evaluate(&chain, at(8)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_peer_recovery_does_not_reopen_throttle() {
    let chain = MockChain::new(ChainRole::Full);
    let mut task = low_peers_task();

    assert!(task.evaluate(&chain, at(0)).await.unwrap().is_none());

    chain.update(|s| s.peers = 1);
    let low = task.evaluate(&chain, at(10)).await.unwrap().unwrap();
    assert_eq!(low.message, "low peer count: 1 (minimum 3)");

    chain.update(|s| s.peers = 10);
    let recovered = task.evaluate(&chain, at(15)).await.unwrap().unwrap();
    assert_eq!(recovered.message, "peer count recovered: 10");
    assert_eq!(task.last_notified(), Some(at(10)));

    // a relapse inside the window stays throttled
    chain.update(|s| s.peers = 1);
    assert!(task.evaluate(&chain, at(20)).await.unwrap().is_none());
    assert!(task.evaluate(&chain, at(70)).await.unwrap().is_some());
}
