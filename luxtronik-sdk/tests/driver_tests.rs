//! Integration tests for the driver worker

mod common;

use std::time::Duration;

use common::*;
use device_store::DeviceStore;
use luxtronik_sdk::{Driver, DriverConfig, HeatPump, SdkError};
use luxtronik_state::{CommandPayload, DeviceTable, EntityId, Language, SwitchCommand, TypedValue};

/// Long enough that no periodic cycle runs during a test
const NO_TICKS: Duration = Duration::from_secs(3600);

fn spawn(controller: &MockController, store: &DeviceStore, poll_interval: Duration) -> Driver {
    let heat_pump = HeatPump::new(controller.client(), DeviceTable::build(Language::English), store.clone());
    Driver::spawn(heat_pump, poll_interval)
}

fn startup_script() -> Vec<(usize, Reply)> {
    vec![
        calculated_reply(registers(CALCULATED_LEN, &[(10, 215)])),
        parameters_reply(registers(PARAMETERS_LEN, &[(105, 450)])),
    ]
}

#[test]
fn test_commands_queue_behind_startup_cycle() {
    let mut script = startup_script();
    script.push(write_reply());
    script.push(parameters_reply(registers(PARAMETERS_LEN, &[(105, 480)])));
    let controller = MockController::start(script);
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, NO_TICKS);
    driver
        .handle()
        .send_command(EntityId(7), CommandPayload::level(48.0))
        .unwrap();
    driver.shutdown();

    assert_eq!(
        controller.requests(),
        vec![vec![3004, 0], vec![3003, 0], vec![3002, 105, 480], vec![3003, 0]]
    );
    assert_eq!(store.len(), 29);
    assert_eq!(store.get(EntityId(1)).unwrap().value, TypedValue::display("21.5"));
    assert_eq!(store.get(EntityId(7)).unwrap().value, TypedValue::display("48.0"));
}

#[test]
fn test_host_command_callback() {
    let mut script = startup_script();
    script.push(write_reply());
    script.push(parameters_reply(registers(PARAMETERS_LEN, &[(3, 3)])));
    let controller = MockController::start(script);
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, NO_TICKS);
    driver.handle().on_command(14, "Set Level", 30.0).unwrap();
    driver.shutdown();

    let requests = controller.requests();
    assert_eq!(requests[2], vec![3002, 3, 3]);
    assert_eq!(store.get(EntityId(14)).unwrap().value, TypedValue::both(30, "30"));
}

#[test]
fn test_periodic_cycles() {
    let mut script = startup_script();
    script.extend(startup_script());
    let controller = MockController::start(script);
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, Duration::from_millis(50));
    let requests = controller.requests();
    driver.shutdown();

    assert_eq!(requests, vec![vec![3004, 0], vec![3003, 0], vec![3004, 0], vec![3003, 0]]);
}

#[test]
fn test_unschedulable_interval_still_serves_commands() {
    let mut script = startup_script();
    script.push(write_reply());
    script.push(parameters_reply(registers(PARAMETERS_LEN, &[(108, 1)])));
    let controller = MockController::start(script);
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, Duration::MAX);
    driver
        .handle()
        .send_command(EntityId(16), CommandPayload::switch(SwitchCommand::On))
        .unwrap();
    driver.shutdown();

    let requests = controller.requests();
    assert_eq!(requests[2], vec![3002, 108, 1]);
    assert_eq!(store.get(EntityId(16)).unwrap().value, TypedValue::numeric(1));
}

#[test]
fn test_rejected_command_keeps_driver_running() {
    let mut script = startup_script();
    script.push(write_reply());
    script.push(parameters_reply(registers(PARAMETERS_LEN, &[(105, 300)])));
    let controller = MockController::start(script);
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, NO_TICKS);
    let handle = driver.handle();
    handle.send_command(EntityId(7), CommandPayload::level(99.0)).unwrap();
    handle.send_command(EntityId(1), CommandPayload::level(1.0)).unwrap();
    handle.send_command(EntityId(7), CommandPayload::level(30.0)).unwrap();
    driver.shutdown();

    let requests = controller.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[2], vec![3002, 105, 300]);
}

#[test]
fn test_handle_after_shutdown() {
    let controller = MockController::start(startup_script());
    let store = DeviceStore::new();

    let driver = spawn(&controller, &store, NO_TICKS);
    let handle = driver.handle();
    driver.shutdown();

    assert!(matches!(
        handle.send_command(EntityId(7), CommandPayload::level(40.0)),
        Err(SdkError::DriverStopped)
    ));
    controller.requests();
}

#[test]
fn test_start_rejects_invalid_config() {
    let config = DriverConfig {
        language: 7,
        ..DriverConfig::default()
    };

    let result = Driver::start(&config, DeviceStore::new());
    assert!(matches!(result, Err(SdkError::Config(_))));
}
