// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Name and label resolution for chart resources.
//!
//! These functions compute the same strings as the chart's helper templates
//! (`name`, `full-name`, `chart`, `labels`, `selector-labels` and
//! `service-account-name`). All functions are pure and never fail: empty
//! overrides are treated exactly like absent ones.
//!
//! # Example
//!
//! ```rust
//! use openvpn_as_chart::names::{resolve_full_name, resolve_name};
//!
//! assert_eq!(resolve_name("openvpn-as", None), "openvpn-as");
//! assert_eq!(
//!     resolve_full_name("openvpn-as", "vpn", None, None),
//!     "vpn-openvpn-as"
//! );
//! // A release already named after the chart is used as is
//! assert_eq!(
//!     resolve_full_name("openvpn-as", "corp-openvpn-as", None, None),
//!     "corp-openvpn-as"
//! );
//! ```

use crate::chart::ChartMetadata;
use crate::constants::{DEFAULT_SERVICE_ACCOUNT_NAME, MAX_NAME_LENGTH, NAME_SEPARATOR};
use crate::labels::{HELM_CHART, K8S_INSTANCE, K8S_MANAGED_BY, K8S_NAME, K8S_VERSION, MANAGED_BY_HELM};
use crate::values::ChartValues;
use std::collections::BTreeMap;

/// Returns `value` when it is present and non-empty.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Clamps `value` to [`MAX_NAME_LENGTH`] characters, then strips trailing separators.
///
/// Truncation happens first, so stripping may leave fewer than 63 characters.
#[must_use]
pub fn truncate_name(value: &str) -> String {
    let truncated = match value.char_indices().nth(MAX_NAME_LENGTH) {
        Some((index, _)) => &value[..index],
        None => value,
    };
    truncated.trim_end_matches(NAME_SEPARATOR).to_string()
}

/// Resolves the short name of the chart.
///
/// Uses `name_override` when non-empty, the chart name otherwise.
///
/// # Arguments
///
/// * `chart_name` - Name from `Chart.yaml`
/// * `name_override` - Optional `nameOverride` value
///
/// # Returns
///
/// At most 63 characters, never ending in `-`
#[must_use]
pub fn resolve_name(chart_name: &str, name_override: Option<&str>) -> String {
    truncate_name(non_empty(name_override).unwrap_or(chart_name))
}

/// Resolves the full name used as the prefix of every resource name.
///
/// - A non-empty `full_name_override` wins, clamped and stripped.
/// - Otherwise the base is `name_override` (or the chart name). A release
///   name containing the base anywhere is returned verbatim, without
///   re-truncation.
/// - Otherwise `<release>-<base>`, clamped and stripped.
///
/// # Arguments
///
/// * `chart_name` - Name from `Chart.yaml`
/// * `release_name` - Helm release name
/// * `name_override` - Optional `nameOverride` value
/// * `full_name_override` - Optional `fullNameOverride` value
#[must_use]
pub fn resolve_full_name(
    chart_name: &str,
    release_name: &str,
    name_override: Option<&str>,
    full_name_override: Option<&str>,
) -> String {
    if let Some(full_name_override) = non_empty(full_name_override) {
        return truncate_name(full_name_override);
    }

    let base = non_empty(name_override).unwrap_or(chart_name);
    if release_name.contains(base) {
        return release_name.to_string();
    }

    truncate_name(&format!("{release_name}{NAME_SEPARATOR}{base}"))
}

/// Resolves the `helm.sh/chart` label value: `<chart-name>-<chart-version>`.
///
/// `+` is not allowed in label values, so build metadata separators become `_`.
#[must_use]
pub fn resolve_chart_label(chart_name: &str, chart_version: &str) -> String {
    truncate_name(&format!("{chart_name}{NAME_SEPARATOR}{chart_version}").replace('+', "_"))
}

/// Builds the full label set stamped on every chart resource.
///
/// Always returns exactly five entries:
/// instance, managed-by, name, version and chart.
///
/// # Arguments
///
/// * `chart_name` - Name from `Chart.yaml`
/// * `chart_version` - Version from `Chart.yaml`
/// * `app_version` - `appVersion` from `Chart.yaml`
/// * `release_name` - Helm release name
/// * `name_override` - Optional `nameOverride` value, feeds the name label
///
/// # Returns
///
/// A `BTreeMap` of label key-value pairs
#[must_use]
pub fn resolve_labels(
    chart_name: &str,
    chart_version: &str,
    app_version: &str,
    release_name: &str,
    name_override: Option<&str>,
) -> BTreeMap<String, String> {
    let mut labels = resolve_selector_labels(chart_name, release_name, name_override);
    labels.insert(K8S_MANAGED_BY.into(), MANAGED_BY_HELM.into());
    labels.insert(K8S_VERSION.into(), app_version.into());
    labels.insert(
        HELM_CHART.into(),
        resolve_chart_label(chart_name, chart_version),
    );
    labels
}

/// Builds the selector labels: instance and name.
///
/// Always a subset of [`resolve_labels`].
#[must_use]
pub fn resolve_selector_labels(
    chart_name: &str,
    release_name: &str,
    name_override: Option<&str>,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(K8S_INSTANCE.into(), release_name.into());
    labels.insert(K8S_NAME.into(), resolve_name(chart_name, name_override));
    labels
}

/// Resolves the service account pods run as.
///
/// | `create` | name given | result |
/// |---|---|---|
/// | false | no | `"default"` |
/// | false | yes | the name |
/// | true | no | `full_name` |
/// | true | yes | the name |
#[must_use]
pub fn resolve_service_account_name(
    full_name: &str,
    create: bool,
    service_account_name: Option<&str>,
) -> String {
    match non_empty(service_account_name) {
        Some(name) => name.to_string(),
        None if create => full_name.to_string(),
        None => DEFAULT_SERVICE_ACCOUNT_NAME.to_string(),
    }
}

/// One release of a chart, optionally bound to a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseContext {
    /// Helm release name
    pub release_name: String,
    /// Target namespace, stamped on built resources when set
    pub namespace: Option<String>,
    /// Metadata of the chart being released
    pub chart: ChartMetadata,
}

impl ReleaseContext {
    #[must_use]
    pub fn new(release_name: impl Into<String>, chart: ChartMetadata) -> Self {
        Self {
            release_name: release_name.into(),
            namespace: None,
            chart,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The chart `appVersion`, empty when `Chart.yaml` omits it.
    #[must_use]
    pub fn app_version(&self) -> &str {
        self.chart.app_version.as_deref().unwrap_or_default()
    }
}

/// Every derived name of a release, computed once.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNames {
    pub name: String,
    pub full_name: String,
    pub chart: String,
    pub labels: BTreeMap<String, String>,
    pub selector_labels: BTreeMap<String, String>,
    pub service_account_name: String,
}

impl ResolvedNames {
    /// Resolves all names for `ctx` using the overrides found in `values`.
    #[must_use]
    pub fn resolve(ctx: &ReleaseContext, values: &ChartValues) -> Self {
        let chart = &ctx.chart;
        let name_override = values.name_override.as_deref();
        let full_name = resolve_full_name(
            &chart.name,
            &ctx.release_name,
            name_override,
            values.full_name_override.as_deref(),
        );
        let service_account_name = resolve_service_account_name(
            &full_name,
            values.service_account.create,
            values.service_account.name.as_deref(),
        );

        Self {
            name: resolve_name(&chart.name, name_override),
            chart: resolve_chart_label(&chart.name, &chart.version),
            labels: resolve_labels(
                &chart.name,
                &chart.version,
                ctx.app_version(),
                &ctx.release_name,
                name_override,
            ),
            selector_labels: resolve_selector_labels(
                &chart.name,
                &ctx.release_name,
                name_override,
            ),
            full_name,
            service_account_name,
        }
    }
}
