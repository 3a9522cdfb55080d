// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Chart directory loading.
//!
//! Reads `Chart.yaml`, `values.yaml` and `values.schema.json` from a chart
//! directory laid out as `<charts-dir>/<chart>/`. Dependencies declared in
//! `Chart.yaml` are exposed as metadata only; they are never resolved.

use crate::constants::{CHART_YAML_FILENAME, VALUES_SCHEMA_FILENAME, VALUES_YAML_FILENAME};
use crate::errors::ChartError;
use crate::names::ReleaseContext;
use crate::values::ChartValues;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata from a chart's `Chart.yaml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart API version (`v2` for Helm 3 charts)
    #[serde(default)]
    pub api_version: Option<String>,

    /// Chart name, the default base of every resource name
    pub name: String,

    /// Chart version (SemVer)
    pub version: String,

    /// Version of the packaged application
    ///
    /// Used for the `app.kubernetes.io/version` label and as the default image tag.
    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// `application` or `library`
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,
}

impl ChartMetadata {
    /// Minimal metadata for a chart with the given name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_version: None,
            name: name.into(),
            version: version.into(),
            app_version: None,
            description: None,
            chart_type: None,
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    /// Declared dependencies keyed by dependency name.
    #[must_use]
    pub fn dependencies_by_name(&self) -> BTreeMap<String, ChartDependency> {
        self.dependencies
            .iter()
            .map(|dependency| (dependency.name.clone(), dependency.clone()))
            .collect()
    }
}

/// One entry of the `dependencies` list in `Chart.yaml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDependency {
    pub name: String,
    /// Absent for dependencies vendored under `charts/`
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Path of the chart directory `chart_dir_name` under `charts_dir`.
#[must_use]
pub fn chart_path(charts_dir: &Path, chart_dir_name: &str) -> PathBuf {
    charts_dir.join(chart_dir_name)
}

fn read_file(path: &Path) -> Result<String, ChartError> {
    fs::read_to_string(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `Chart.yaml` from `chart_dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or lacks `name` or `version`.
pub fn load_chart_metadata(chart_dir: &Path) -> Result<ChartMetadata, ChartError> {
    let path = chart_dir.join(CHART_YAML_FILENAME);
    let contents = read_file(&path)?;
    let metadata: ChartMetadata =
        serde_yaml::from_str(&contents).map_err(|source| ChartError::Yaml {
            path: path.clone(),
            source,
        })?;

    debug!(
        chart = %metadata.name,
        version = %metadata.version,
        dependencies = metadata.dependencies.len(),
        "Loaded chart metadata"
    );
    Ok(metadata)
}

/// Loads the default values tree from `values.yaml` in `chart_dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not YAML, or its top level
/// is not a mapping.
pub fn load_default_values(chart_dir: &Path) -> Result<serde_yaml::Value, ChartError> {
    let path = chart_dir.join(VALUES_YAML_FILENAME);
    let contents = read_file(&path)?;
    let values: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|source| ChartError::Yaml {
            path: path.clone(),
            source,
        })?;

    if !values.is_mapping() {
        return Err(ChartError::NotAMapping { path });
    }
    Ok(values)
}

/// Loads `values.schema.json` from `chart_dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or is not an object.
pub fn load_values_schema(chart_dir: &Path) -> Result<serde_json::Value, ChartError> {
    let path = chart_dir.join(VALUES_SCHEMA_FILENAME);
    let contents = read_file(&path)?;
    let schema: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| ChartError::Json {
            path: path.clone(),
            source,
        })?;

    if !schema.is_object() {
        return Err(ChartError::NotAMapping { path });
    }
    Ok(schema)
}

/// A chart directory with its metadata and default values loaded.
#[derive(Clone, Debug)]
pub struct LoadedChart {
    pub dir: PathBuf,
    pub metadata: ChartMetadata,
    pub default_values: serde_yaml::Value,
}

impl LoadedChart {
    /// Loads `Chart.yaml` and `values.yaml` from `chart_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file fails to load.
    pub fn load(chart_dir: impl Into<PathBuf>) -> Result<Self, ChartError> {
        let dir = chart_dir.into();
        let metadata = load_chart_metadata(&dir)?;
        let default_values = load_default_values(&dir)?;
        Ok(Self {
            dir,
            metadata,
            default_values,
        })
    }

    /// Typed values: the chart defaults with `layers` coalesced on top, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged tree does not match [`ChartValues`].
    pub fn values(&self, layers: &[serde_yaml::Value]) -> Result<ChartValues, ChartError> {
        ChartValues::from_layers(&self.default_values, layers)
    }

    /// A release of this chart named `release_name`.
    #[must_use]
    pub fn release(&self, release_name: impl Into<String>) -> ReleaseContext {
        ReleaseContext::new(release_name, self.metadata.clone())
    }
}
