//! Integration tests for the broker's subscription lifecycle.


use std::sync::Arc;
use std::time::Duration;

use mock_service::{MockAdapterService, RecordingObserver};
use uwb_state::{
    raw, watch, AdapterState, AdapterStateBroker, AdapterStateCallback, AdapterStateObserver,
    InlineExecutor, StateChangeReason, ThreadExecutor,
};

#[test]
fn test_single_subscription_across_many_observers() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    for _ in 0..5 {
        broker.register(Arc::new(InlineExecutor), RecordingObserver::new());
    }

    assert_eq!(service.subscribe_count(), 1);
    assert_eq!(broker.observer_count(), 5);
    assert!(broker.is_subscribed());
}

#[test]
fn test_catch_up_without_new_remote_call() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    broker.register(Arc::new(InlineExecutor), RecordingObserver::new());
    service.push_state(true, raw::SESSION_STARTED);

    let late = RecordingObserver::new();
    broker.register(Arc::new(InlineExecutor), late.clone());

    assert_eq!(
        late.states(),
        vec![AdapterState::new(true, StateChangeReason::SessionStarted)]
    );
    assert_eq!(service.subscribe_count(), 1);
}

#[test]
fn test_fan_out_reaches_every_observer_in_order() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    let observers: Vec<_> = (0..4).map(|_| RecordingObserver::new()).collect();
    for observer in &observers {
        broker.register(Arc::new(InlineExecutor), observer.clone());
    }

    service.push_state(true, raw::SESSION_STARTED);
    service.push_state(false, raw::ALL_SESSIONS_CLOSED);

    let expected = vec![
        AdapterState::new(true, StateChangeReason::SessionStarted),
        AdapterState::new(false, StateChangeReason::AllSessionsClosed),
    ];
    for observer in &observers {
        assert_eq!(observer.states(), expected);
    }
}

#[test]
fn test_unknown_reason_code_normalizes() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    let observer = RecordingObserver::new();
    broker.register(Arc::new(InlineExecutor), observer.clone());

    service.push_state(false, 9999);

    assert_eq!(
        observer.states(),
        vec![AdapterState::new(false, StateChangeReason::Unknown)]
    );
}

#[test]
fn test_subscribe_failure_keeps_observer_and_retries_later() {
    let service = MockAdapterService::new();
    service.set_fail_subscribe(true);
    let broker = AdapterStateBroker::new(service.clone());

    let first = RecordingObserver::new();
    broker.register(Arc::new(InlineExecutor), first.clone());

    // Exactly one synthetic disabled/unknown notification, and the observer
    // is still registered even though no subscription exists.
    assert_eq!(first.states(), vec![AdapterState::default()]);
    assert_eq!(broker.observer_count(), 1);
    assert!(!broker.is_subscribed());
    assert_eq!(service.subscribe_count(), 1);

    // A later registration retries the subscribe.
    service.set_fail_subscribe(false);
    broker.register(Arc::new(InlineExecutor), RecordingObserver::new());

    assert_eq!(service.subscribe_count(), 2);
    assert!(broker.is_subscribed());
    // The failed observer got no second notification from the retry.
    assert_eq!(first.states(), vec![AdapterState::default()]);
}

#[test]
fn test_unregister_to_empty_unsubscribes_once() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    let observers: Vec<Arc<dyn AdapterStateObserver>> = (0..3)
        .map(|_| RecordingObserver::new() as Arc<dyn AdapterStateObserver>)
        .collect();
    for observer in &observers {
        broker.register(Arc::new(InlineExecutor), observer.clone());
    }

    for observer in &observers {
        broker.unregister(observer);
    }

    assert_eq!(service.unsubscribe_count(), 1);
    assert_eq!(broker.observer_count(), 0);
    assert!(!broker.is_subscribed());
}

#[test]
fn test_unsubscribe_failure_transitions_locally() {
    let service = MockAdapterService::new();
    service.set_fail_unsubscribe(true);
    let broker = AdapterStateBroker::new(service.clone());

    let observer: Arc<dyn AdapterStateObserver> = RecordingObserver::new();
    broker.register(Arc::new(InlineExecutor), observer.clone());
    broker.unregister(&observer);

    // Optimistic transition: the failed unsubscribe is logged, the broker
    // still records itself as unsubscribed.
    assert_eq!(service.unsubscribe_count(), 1);
    assert!(!broker.is_subscribed());

    // The next registration starts a fresh subscription.
    broker.register(Arc::new(InlineExecutor), RecordingObserver::new());
    assert_eq!(service.subscribe_count(), 2);
    assert!(broker.is_subscribed());
}

#[test]
fn test_stale_callback_after_unsubscribe_is_harmless() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    let observer: Arc<dyn AdapterStateObserver> = RecordingObserver::new();
    broker.register(Arc::new(InlineExecutor), observer.clone());

    let stale = service.callback().unwrap();
    broker.unregister(&observer);

    // The service may deliver one more event racing the unsubscribe; it
    // only overwrites the last known state and reaches no observer.
    stale.on_adapter_state_changed(true, raw::SESSION_STARTED);

    assert_eq!(broker.observer_count(), 0);
    assert_eq!(
        broker.last_known_state(),
        AdapterState::new(true, StateChangeReason::SessionStarted)
    );
}

#[test]
fn test_watcher_receives_states_through_broker() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    let (watcher, states) = watch::channel();
    broker.register(Arc::new(ThreadExecutor::new()), watcher);

    service.push_state(true, raw::SESSION_STARTED);
    service.push_state(false, raw::SYSTEM_POLICY);

    let received: Vec<_> = states
        .timeout_iter(Duration::from_secs(5))
        .take(2)
        .collect();
    assert_eq!(
        received,
        vec![
            AdapterState::new(true, StateChangeReason::SessionStarted),
            AdapterState::new(false, StateChangeReason::SystemPolicy),
        ]
    );
}

#[test]
fn test_last_known_state_tracks_service() {
    let service = MockAdapterService::new();
    let broker = AdapterStateBroker::new(service.clone());

    assert_eq!(broker.last_known_state(), AdapterState::default());

    broker.register(Arc::new(InlineExecutor), RecordingObserver::new());
    service.push_state(true, raw::SYSTEM_BOOT);

    assert_eq!(
        broker.last_known_state(),
        AdapterState::new(true, StateChangeReason::SystemBoot)
    );
}
