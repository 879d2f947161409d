//! Startup argument and configuration errors

use std::fs;

use crate::common::IndexFixture;

#[test]
fn test_no_arguments_is_usage_error() {
    let fx = IndexFixture::new();
    let output = fx.run_cli(&[]).expect("Failed to run CLI");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn test_target_without_source_is_usage_error() {
    let fx = IndexFixture::new();
    let idx = fx.idx();
    let output = fx
        .run_cli(&[idx.to_str().unwrap()])
        .expect("Failed to run CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SOURCE"), "stderr: {stderr}");
}

#[test]
fn test_source_that_is_a_file_is_config_error() {
    let fx = IndexFixture::new();
    let file = fx.add_file("plain.txt", "x");
    let idx = fx.idx();

    let output = fx
        .run_cli(&[idx.to_str().unwrap(), file.to_str().unwrap()])
        .expect("Failed to run CLI");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"), "stderr: {stderr}");
}

#[test]
fn test_unparseable_config_file_is_config_error() {
    let fx = IndexFixture::new();
    let config = fx.root().join("dateindex.toml");
    fs::write(&config, "[policy]\non_fs_error = \"explode\"\n").unwrap();
    let idx = fx.idx();
    let src = fx.src();

    let output = fx
        .run_cli(&[
            "--config",
            config.to_str().unwrap(),
            idx.to_str().unwrap(),
            src.to_str().unwrap(),
        ])
        .expect("Failed to run CLI");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "stderr: {stderr}");
}

#[test]
fn test_unknown_policy_flag_is_rejected() {
    let fx = IndexFixture::new();
    let idx = fx.idx();
    let src = fx.src();
    let output = fx
        .run_cli(&[
            "--on-fs-error",
            "ignore",
            idx.to_str().unwrap(),
            src.to_str().unwrap(),
        ])
        .expect("Failed to run CLI");

    assert!(!output.status.success());
}
