//! Concurrency and failure behaviour of the batch dispatcher.

mod common;

use std::time::{Duration, Instant};

use clocktower_effects::{
    BatchCommandDispatcher, EffectDispatcher, EffectError, EffectParams, RemoteCommand,
    SmartThingsLights,
};
use serde_json::json;

fn switch(id: &str) -> RemoteCommand {
    RemoteCommand::new(
        format!("devices/{}/commands", id),
        json!({ "commands": [{ "component": "main", "capability": "switch", "command": "on" }] }),
    )
}

#[tokio::test]
async fn test_failed_command_does_not_cancel_siblings() {
    let (base, calls) = common::spawn_server();
    let dispatcher = BatchCommandDispatcher::new(&base, "secret").unwrap();

    let started = Instant::now();
    let report = dispatcher
        .dispatch(vec![switch("one"), switch("broken"), switch("three")])
        .await;
    let elapsed = started.elapsed();

    assert_eq!(report.len(), 3);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(calls.lock().unwrap().len(), 3);

    let failed = report
        .outcomes
        .iter()
        .find(|o| o.result.is_err())
        .unwrap();
    assert_eq!(failed.path, "devices/broken/commands");
    assert!(matches!(
        failed.result,
        Err(EffectError::Status { status: 500, .. })
    ));

    // Three 200ms commands run side by side, not back to back
    assert!(elapsed < Duration::from_millis(600), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_results_arrive_in_completion_order() {
    let (base, _calls) = common::spawn_server();
    let dispatcher = BatchCommandDispatcher::new(&base, "secret").unwrap();

    let report = dispatcher
        .dispatch(vec![switch("slow-1"), switch("fast-1")])
        .await;

    let order: Vec<_> = report.outcomes.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(
        order,
        vec!["devices/fast-1/commands", "devices/slow-1/commands"]
    );
}

#[tokio::test]
async fn test_per_command_timeout() {
    let (base, _calls) = common::spawn_server();
    let dispatcher = BatchCommandDispatcher::new(&base, "secret")
        .unwrap()
        .with_timeout(Some(Duration::from_millis(100)));

    let report = dispatcher
        .dispatch(vec![switch("slow-1"), switch("fast-1")])
        .await;

    assert_eq!(report.failure_count(), 1);
    match report.into_result() {
        Err(EffectError::BatchPartialFailure(failures)) => {
            assert_eq!(failures[0].path, "devices/slow-1/commands");
            assert!(matches!(failures[0].error, EffectError::Request(_)));
        }
        other => panic!("expected partial failure, got {:?}", other),
    }
}

#[test]
fn test_smartthings_switches_every_device() {
    let (base, calls) = common::spawn_server();
    let lights = SmartThingsLights::with_base_url(
        &base,
        "secret",
        vec!["one".into(), "fast-2".into()],
        None,
    )
    .unwrap();

    lights
        .trigger_named_effect("lights_off", &EffectParams::new())
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    for call in calls.iter() {
        assert_eq!(call.auth.as_deref(), Some("Bearer secret"));
        assert_eq!(call.body["commands"][0]["command"], "off");
        assert_eq!(call.body["commands"][0]["capability"], "switch");
    }
}

#[test]
fn test_smartthings_surfaces_partial_failure() {
    let (base, _calls) = common::spawn_server();
    let lights =
        SmartThingsLights::with_base_url(&base, "secret", vec!["one".into(), "broken".into()], None)
            .unwrap();

    let err = lights
        .trigger_named_effect("lights_on", &EffectParams::new())
        .unwrap_err();
    match err {
        EffectError::BatchPartialFailure(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].path, "devices/broken/commands");
        }
        other => panic!("expected partial failure, got {:?}", other),
    }
}
