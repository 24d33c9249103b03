//! Scheduler wired to the file-backed queue

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use timemachine_core::application::{Dispatcher, Scheduler};
use timemachine_core::domain::{CronSchedule, Message};
use timemachine_core::port::delivery::mocks::MockDelivery;
use timemachine_core::port::time_provider::SystemTimeProvider;
use timemachine_core::port::MessageQueue;
use timemachine_infra_json::JsonFileQueue;

async fn wait_for_calls(delivery: &MockDelivery, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while delivery.call_count() < expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("delivery was not attempted in time");
}

#[tokio::test]
async fn test_boot_fire_delivers_head_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");
    let queue = Arc::new(JsonFileQueue::open(&path).await.unwrap());
    queue.add(Message::new("good morning")).await.unwrap();
    queue.add(Message::new("drink water")).await.unwrap();

    let delivery = Arc::new(MockDelivery::new_success());
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), delivery.clone()));
    // Yearly at midnight Jan 1: only the boot fire happens during the test
    let schedule = CronSchedule::parse("@yearly", "Asia/Muscat").unwrap();

    let handle = Scheduler::new(dispatcher, schedule, Arc::new(SystemTimeProvider)).start();
    wait_for_calls(&delivery, 1).await;
    handle.stop().await;

    assert_eq!(delivery.delivered(), vec!["good morning"]);
    let reopened = JsonFileQueue::open(&path).await.unwrap();
    assert_eq!(reopened.snapshot().await, vec![Message::new("drink water")]);
}

#[tokio::test]
async fn test_boot_fire_with_failing_relay_keeps_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");
    let queue = Arc::new(JsonFileQueue::open(&path).await.unwrap());
    queue.add(Message::new("only one")).await.unwrap();

    let delivery = Arc::new(MockDelivery::new_fail("535 authentication failed"));
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), delivery.clone()));
    let schedule = CronSchedule::parse("0 7 1 1 *", "UTC").unwrap();

    let handle = Scheduler::new(dispatcher, schedule, Arc::new(SystemTimeProvider)).start();
    wait_for_calls(&delivery, 1).await;
    handle.stop().await;

    assert!(delivery.delivered().is_empty());
    let reopened = JsonFileQueue::open(&path).await.unwrap();
    assert_eq!(reopened.snapshot().await, vec![Message::new("only one")]);
}

#[test]
fn test_default_schedule_is_seven_in_muscat() {
    let schedule = CronSchedule::parse("0 7 * * *", "Asia/Muscat").unwrap();
    // Muscat is UTC+4 all year, so 07:00 local is 03:00 UTC
    let after = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

    let next = schedule.upcoming(after, 2);

    assert_eq!(
        next,
        vec![
            Utc.with_ymd_and_hms(2024, 3, 11, 3, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 12, 3, 0, 0).unwrap(),
        ]
    );
}
