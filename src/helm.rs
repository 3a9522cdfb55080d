// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Thin wrapper around the `helm` binary.
//!
//! [`HelmRunner`] shells out to `helm template` and parses the rendered
//! multi-document YAML. [`HelperRenderer`] evaluates a single named helper
//! template (`<chart>.<helper>`) by rendering an ad-hoc template that
//! includes it against a temporary copy of the chart.
//!
//! # Example
//!
//! ```rust,no_run
//! use openvpn_as_chart::helm::{HelmRunner, HelperRenderer};
//!
//! # async fn example() -> Result<(), openvpn_as_chart::errors::HelmError> {
//! let runner = HelmRunner::new("charts");
//! let renderer = HelperRenderer::new("openvpn-as", runner);
//! let full_name = renderer.render("full-name", "vpn", None, &[]).await?;
//! assert_eq!(full_name, "vpn-openvpn-as");
//! # Ok(())
//! # }
//! ```

use crate::constants::{ADHOC_TEMPLATE_FILENAME, HELM_BINARY, HELPER_RESULT_KEY, TEMPLATES_DIR};
use crate::errors::HelmError;
use serde::Deserialize;
use serde_yaml::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// A fresh release name, for renders where the name does not matter.
#[must_use]
pub fn random_release_name() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Runs `helm template` against charts below a working directory.
#[derive(Clone, Debug)]
pub struct HelmRunner {
    cwd: PathBuf,
    binary: String,
}

impl HelmRunner {
    /// A runner resolving chart names relative to `cwd` (the charts directory).
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            binary: HELM_BINARY.to_string(),
        }
    }

    /// Uses `binary` instead of `helm` from `PATH`.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Whether `helm version` runs successfully.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Renders `chart` as release `release_name`.
    ///
    /// # Arguments
    ///
    /// * `chart` - Chart directory, relative to the runner's working directory
    /// * `release_name` - Release name passed to helm
    /// * `show_only` - Template paths to restrict output to (`templates/deployment.yaml`)
    /// * `values` - Values layers, applied in order
    ///
    /// # Returns
    ///
    /// Every non-empty rendered document, in output order
    ///
    /// # Errors
    ///
    /// Returns an error if helm cannot be started, fails, or prints invalid YAML.
    pub async fn template(
        &self,
        chart: &str,
        release_name: &str,
        show_only: &[&str],
        values: &[Value],
    ) -> Result<Vec<Value>, HelmError> {
        self.template_at(Path::new(chart), release_name, show_only, values)
            .await
    }

    /// Renders `content` as an extra template of `chart` and returns its single document.
    ///
    /// The chart is copied to a temporary directory first, so the chart on
    /// disk is never modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be copied, helm fails, or the
    /// template renders no document.
    pub async fn adhoc_template(
        &self,
        chart: &str,
        content: &str,
        release_name: &str,
        values: &[Value],
    ) -> Result<Value, HelmError> {
        let workdir = temp_dir().await?;
        let chart_copy = workdir.path().join(chart);
        copy_dir(&self.cwd.join(chart), &chart_copy).await?;

        let templates_dir = chart_copy.join(TEMPLATES_DIR);
        fs::create_dir_all(&templates_dir).await?;
        fs::write(templates_dir.join(ADHOC_TEMPLATE_FILENAME), content).await?;
        debug!(chart, copy = %chart_copy.display(), "Prepared chart copy for ad-hoc template");

        let show_only = format!("{TEMPLATES_DIR}/{ADHOC_TEMPLATE_FILENAME}");
        self.template_at(&chart_copy, release_name, &[show_only.as_str()], values)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HelmError::InvalidOutput {
                reason: "ad-hoc template rendered no document".to_string(),
            })
    }

    /// The chart's values as helm computes them (defaults only).
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub async fn computed_values(&self, chart: &str) -> Result<Value, HelmError> {
        self.adhoc_template(chart, "{{ toYaml .Values }}", &random_release_name(), &[])
            .await
    }

    async fn template_at(
        &self,
        chart: &Path,
        release_name: &str,
        show_only: &[&str],
        values: &[Value],
    ) -> Result<Vec<Value>, HelmError> {
        let (_values_dir, values_files) = write_values_files(values).await?;

        let mut args: Vec<OsString> = vec![
            "template".into(),
            release_name.into(),
            chart.as_os_str().to_owned(),
        ];
        for template in show_only {
            args.push("--show-only".into());
            args.push((*template).into());
        }
        for file in &values_files {
            args.push("--values".into());
            args.push(file.as_os_str().to_owned());
        }

        let stdout = self.run(&args).await?;
        let documents = parse_documents(&stdout)?;
        debug!(
            release = %release_name,
            chart = %chart.display(),
            documents = documents.len(),
            "Rendered chart"
        );
        Ok(documents)
    }

    async fn run(&self, args: &[OsString]) -> Result<String, HelmError> {
        debug!(binary = %self.binary, ?args, "Running helm");
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.cwd)
            .output()
            .await
            .map_err(|source| HelmError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HelmError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| HelmError::InvalidOutput {
            reason: e.to_string(),
        })
    }
}

/// Creates a temporary directory without blocking the runtime.
async fn temp_dir() -> std::io::Result<TempDir> {
    tokio::task::spawn_blocking(tempfile::tempdir)
        .await
        .map_err(std::io::Error::other)?
}

/// Writes each values layer to its own file in a temporary directory.
///
/// The files are deleted when the returned directory drops.
async fn write_values_files(values: &[Value]) -> Result<(TempDir, Vec<PathBuf>), HelmError> {
    let dir = temp_dir().await?;
    let mut files = Vec::with_capacity(values.len());
    for (index, layer) in values.iter().enumerate() {
        let yaml = serde_yaml::to_string(layer).map_err(std::io::Error::other)?;
        let path = dir.path().join(format!("values-{index}.yaml"));
        fs::write(&path, yaml).await?;
        files.push(path);
    }
    Ok((dir, files))
}

/// Splits helm's multi-document output, skipping empty documents.
///
/// # Errors
///
/// Returns an error if any document is not valid YAML.
pub fn parse_documents(output: &str) -> Result<Vec<Value>, HelmError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(output) {
        let value = Value::deserialize(document).map_err(|e| HelmError::InvalidOutput {
            reason: e.to_string(),
        })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// Recursively copies `source` to `destination`.
pub(crate) async fn copy_dir(source: &Path, destination: &Path) -> std::io::Result<()> {
    let mut pending = vec![(source.to_path_buf(), destination.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to).await?;
        let mut entries = fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                fs::copy(entry.path(), target).await?;
            }
        }
    }
    Ok(())
}

/// Renders the chart's named helper templates through helm.
#[derive(Clone, Debug)]
pub struct HelperRenderer {
    chart: String,
    runner: HelmRunner,
}

impl HelperRenderer {
    /// A renderer for helpers of `chart`, which also serves as the default
    /// helper namespace.
    #[must_use]
    pub fn new(chart: impl Into<String>, runner: HelmRunner) -> Self {
        Self {
            chart: chart.into(),
            runner,
        }
    }

    /// Renders helper `<namespace>.<helper_name>` and returns its output.
    ///
    /// # Arguments
    ///
    /// * `helper_name` - Helper name without namespace (`full-name`)
    /// * `release_name` - Release name; empty means a random one
    /// * `helper_namespace` - Defaults to the chart name
    /// * `values` - Values layers, applied in order by helm itself
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the helper produced no string.
    pub async fn render(
        &self,
        helper_name: &str,
        release_name: &str,
        helper_namespace: Option<&str>,
        values: &[Value],
    ) -> Result<String, HelmError> {
        let namespace = helper_namespace.unwrap_or(self.chart.as_str());
        let helper = format!("{namespace}.{helper_name}");
        let content = format!(
            "---\n{HELPER_RESULT_KEY}: |-\n  {{{{- include \"{helper}\" . | nindent 2 }}}}"
        );

        let release_name = if release_name.is_empty() {
            random_release_name()
        } else {
            release_name.to_string()
        };
        let rendered = self
            .runner
            .adhoc_template(&self.chart, &content, &release_name, values)
            .await?;

        rendered
            .get(HELPER_RESULT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(HelmError::MissingResult { helper })
    }
}
