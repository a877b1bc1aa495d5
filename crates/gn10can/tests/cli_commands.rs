#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn gn10can(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gn10can"))
        .args(args)
        .output()
        .expect("gn10can should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn encode_motor_target_as_json() {
    let output = gn10can(&[
        "encode",
        "--type",
        "motor-driver",
        "--id",
        "1",
        "--command",
        "target",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["identifier"], 0x89);
    assert_eq!(value["identifier_hex"], "0x089");
    assert_eq!(value["routing_key"], "0x088");
    assert_eq!(value["command_name"], "target");
}

#[test]
fn decode_servo_frequency() {
    let output = gn10can(&["decode", "0x112", "--format", "json"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["device_type"], "servo-driver");
    assert_eq!(value["device_id"], 2);
    assert_eq!(value["command"], 2);
    assert_eq!(value["command_name"], "frequency");
}

#[test]
fn decode_unknown_type_reports_null() {
    let output = gn10can(&["decode", "1920", "--format", "json"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert!(value["device_type"].is_null());
    assert_eq!(value["device_type_raw"], 15);
}

#[test]
fn decode_pretty_output() {
    let output = gn10can(&["decode", "137", "--format", "pretty"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("type=motor-driver"));
    assert!(text.contains("command=target (1)"));
}

#[test]
fn decode_rejects_garbage_with_usage_code() {
    let output = gn10can(&["decode", "zz"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid identifier"));
}

#[test]
fn decode_rejects_wide_identifier() {
    let output = gn10can(&["decode", "0x800"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn encode_rejects_unknown_type() {
    let output = gn10can(&[
        "encode", "--type", "toaster", "--id", "0", "--command", "0",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn send_rejects_oversized_payload_before_opening() {
    let output = gn10can(&[
        "send",
        "gn10can-missing0",
        "--type",
        "led",
        "--id",
        "0",
        "--command",
        "init",
        "--data",
        "000102030405060708",
    ]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn version_prints_package_version() {
    let output = gn10can(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("gn10can {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_reports_bus_defaults() {
    let output = gn10can(&["version", "--extended"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("registry_capacity: 16"));
    assert!(text.contains("backends: virtual"));
}
