use multilookup_search::{DEFAULT_DEBOUNCE, DebounceGate};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn default_delay_is_400ms() {
    assert_eq!(DEFAULT_DEBOUNCE, Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn burst_emits_only_last_value() {
    let (mut gate, mut settled) = DebounceGate::new(DEFAULT_DEBOUNCE);

    gate.push("a".to_string());
    tokio::time::sleep(Duration::from_millis(100)).await;
    gate.push("ac".to_string());
    tokio::time::sleep(Duration::from_millis(100)).await;
    gate.push("acm".to_string());
    assert!(gate.is_pending());

    assert_eq!(settled.next().await.as_deref(), Some("acm"));
    assert!(settled.try_next().is_none());
}

#[tokio::test(start_paused = true)]
async fn nothing_emitted_before_delay() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(400));

    gate.push(1u32);
    tokio::time::sleep(Duration::from_millis(399)).await;
    assert!(settled.try_next().is_none());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(settled.try_next(), Some(1));
    assert!(!gate.is_pending());
}

#[tokio::test(start_paused = true)]
async fn stable_inputs_each_settle() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(50));

    gate.push(1u32);
    assert_eq!(settled.next().await, Some(1));
    gate.push(2u32);
    assert_eq!(settled.next().await, Some(2));
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_pending_value() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(50));

    gate.push(1u32);
    gate.cancel();
    assert!(!gate.is_pending());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(settled.try_next().is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_gate_cancels_emission() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(50));

    gate.push(1u32);
    drop(gate);

    assert_eq!(settled.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn settled_value_is_superseded_by_newer_push() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(400));

    gate.push("glo".to_string());
    tokio::time::sleep(Duration::from_millis(500)).await;
    gate.push("globex".to_string());

    assert!(settled.try_next().is_none());
    assert_eq!(settled.next().await.as_deref(), Some("globex"));
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_settled_value() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(50));

    gate.push(1u32);
    tokio::time::sleep(Duration::from_millis(100)).await;
    gate.cancel();

    assert!(settled.try_next().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn superseded_timer_on_another_worker_is_ignored() {
    let (mut gate, mut settled) = DebounceGate::new(Duration::from_millis(20));

    gate.push(1u32);
    tokio::time::sleep(Duration::from_millis(60)).await;
    gate.push(2u32);

    assert_eq!(settled.next().await, Some(2));
    assert!(settled.try_next().is_none());
}
