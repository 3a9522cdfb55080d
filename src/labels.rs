// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Common label constants used by the name resolver and resource builders.
//!
//! Keys follow the Kubernetes recommended label set, plus the `helm.sh/chart`
//! label Helm charts conventionally stamp on every resource.

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for the name of the application (the resolved chart name)
pub const K8S_NAME: &str = "app.kubernetes.io/name";

/// Standard label for a unique name identifying the instance of an application
pub const K8S_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard label for the current version of the application (the chart `appVersion`)
pub const K8S_VERSION: &str = "app.kubernetes.io/version";

// ============================================================================
// Helm Labels
// ============================================================================

/// Label carrying `<chart-name>-<chart-version>`
pub const HELM_CHART: &str = "helm.sh/chart";

// ============================================================================
// Label Values
// ============================================================================

/// Value for `app.kubernetes.io/managed-by` on every rendered resource
pub const MANAGED_BY_HELM: &str = "Helm";
