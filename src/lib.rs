// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! # openvpn-as-chart - OpenVPN Access Server Helm chart toolkit
//!
//! Companion library and test harness for the `openvpn-as` Helm chart.
//!
//! ## Overview
//!
//! - Name and label resolution matching the chart's helper templates
//! - Chart loading (`Chart.yaml`, `values.yaml`, `values.schema.json`)
//! - Helm-style values layering and typed chart values
//! - Native `Deployment`/`ServiceAccount` builders using `k8s-openapi` types
//! - A `helm template` wrapper for asserting on rendered manifests
//!
//! ## Modules
//!
//! - [`names`] - Name, full name, label and service account resolution
//! - [`chart`] - Chart metadata and values loading
//! - [`values`] - Typed values, coalescing and `--set` handling
//! - [`resources`] - Kubernetes resource builders
//! - [`helm`] - `helm` subprocess wrapper and helper renderer
//!
//! ## Example
//!
//! ```rust
//! use openvpn_as_chart::chart::ChartMetadata;
//! use openvpn_as_chart::names::ReleaseContext;
//! use openvpn_as_chart::resources::build_deployment;
//! use openvpn_as_chart::values::ChartValues;
//!
//! let chart = ChartMetadata::new("openvpn-as", "0.3.1").with_app_version("2.12.1");
//! let ctx = ReleaseContext::new("vpn", chart);
//! let deployment = build_deployment(&ctx, &ChartValues::default());
//!
//! assert_eq!(deployment.metadata.name.as_deref(), Some("vpn-openvpn-as"));
//! ```

pub mod chart;
pub mod constants;
pub mod errors;
pub mod helm;
pub mod labels;
pub mod names;
pub mod resources;
pub mod values;

#[cfg(test)]
mod errors_tests;
#[cfg(test)]
mod names_tests;
