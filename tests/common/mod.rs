// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use openvpn_as_chart::chart::{chart_path, LoadedChart};
use openvpn_as_chart::constants::{DEFAULT_CHARTS_PATH, DEFAULT_CHART_DIR};
use openvpn_as_chart::helm::{HelmRunner, HelperRenderer};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Release name used when a test does not care about it
pub const EXAMPLE_RELEASE_NAME: &str = "example-release-name";

/// The repository's charts directory
pub fn charts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CHARTS_PATH)
}

/// The chart under test, loaded from disk
pub fn load_chart() -> LoadedChart {
    LoadedChart::load(chart_path(&charts_dir(), DEFAULT_CHART_DIR)).unwrap()
}

/// Get a helm runner or skip the test if helm is not installed
pub async fn get_helm_runner_or_skip() -> Option<HelmRunner> {
    let runner = HelmRunner::new(charts_dir());
    if runner.is_available().await {
        Some(runner)
    } else {
        eprintln!("Skipping integration test: helm is not available on PATH");
        None
    }
}

/// Get a helper renderer for the chart or skip the test if helm is not installed
pub async fn get_helper_renderer_or_skip() -> Option<HelperRenderer> {
    get_helm_runner_or_skip()
        .await
        .map(|runner| HelperRenderer::new(DEFAULT_CHART_DIR, runner))
}

/// Parses a YAML snippet into a values layer
pub fn values(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).unwrap()
}
