// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Global constants for the OpenVPN Access Server chart.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Naming Constants
// ============================================================================

/// Maximum length of a Kubernetes name or label value (DNS-1123 label)
pub const MAX_NAME_LENGTH: usize = 63;

/// Separator between name segments and the character stripped from name tails
pub const NAME_SEPARATOR: char = '-';

/// Service account used when none is created and no name is configured
pub const DEFAULT_SERVICE_ACCOUNT_NAME: &str = "default";

/// Suffix appended to the full name for the default persistence claim
pub const PERSISTENCE_CLAIM_SUFFIX: &str = "data";

// ============================================================================
// Chart Layout Constants
// ============================================================================

/// Directory name of the chart under the charts directory
pub const DEFAULT_CHART_DIR: &str = "openvpn-as";

/// Default charts directory, relative to the repository root
pub const DEFAULT_CHARTS_PATH: &str = "charts";

/// Chart metadata file name
pub const CHART_YAML_FILENAME: &str = "Chart.yaml";

/// Default values file name
pub const VALUES_YAML_FILENAME: &str = "values.yaml";

/// Values schema file name
pub const VALUES_SCHEMA_FILENAME: &str = "values.schema.json";

/// Templates directory inside a chart
pub const TEMPLATES_DIR: &str = "templates";

/// File name used for ad-hoc templates rendered against a chart copy
pub const ADHOC_TEMPLATE_FILENAME: &str = "adhoc-template.yaml";

/// Key under which the helper renderer stores an included helper's output
pub const HELPER_RESULT_KEY: &str = "result";

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// API version of rendered `Deployment` resources
pub const DEPLOYMENT_API_VERSION: &str = "apps/v1";

/// Kind of rendered `Deployment` resources
pub const KIND_DEPLOYMENT: &str = "Deployment";

/// Kind of rendered `ServiceAccount` resources
pub const KIND_SERVICE_ACCOUNT: &str = "ServiceAccount";

// ============================================================================
// OpenVPN Access Server Constants
// ============================================================================

/// Default image repository
pub const DEFAULT_IMAGE_REPOSITORY: &str = "openvpn/openvpn-as";

/// Default image pull policy
pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";

/// Default container timezone
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Environment variable carrying the timezone
pub const ENV_TIMEZONE: &str = "TZ";

/// Default VPN TCP port
pub const DEFAULT_VPN_TCP_PORT: i32 = 443;

/// Default VPN UDP port
pub const DEFAULT_VPN_UDP_PORT: i32 = 1194;

/// Default admin/client web UI port
pub const DEFAULT_VPN_UI_PORT: i32 = 943;

/// Container port name for VPN over TCP
pub const PORT_NAME_VPN_TCP: &str = "vpn-tcp";

/// Container port name for VPN over UDP
pub const PORT_NAME_VPN_UDP: &str = "vpn-udp";

/// Container port name for the web UI
pub const PORT_NAME_VPN_UI: &str = "vpn-ui";

/// Access Server CLI used by the liveness probe
pub const SACLI_PATH: &str = "/usr/local/openvpn_as/scripts/sacli";

/// `sacli` subcommand used by the liveness probe
pub const SACLI_STATUS_COMMAND: &str = "Status";

/// Volume name for Access Server state
pub const VOLUME_PERSISTENCE: &str = "persistence";

/// Mount path for Access Server state
pub const PERSISTENCE_MOUNT_PATH: &str = "/openvpn";

// ============================================================================
// Kubernetes Health Check Constants
// ============================================================================

/// Liveness probe initial delay (Access Server takes a while to initialize)
pub const LIVENESS_INITIAL_DELAY_SECS: i32 = 100;

/// Liveness probe timeout
pub const LIVENESS_TIMEOUT_SECS: i32 = 5;

/// Readiness probe initial delay
pub const READINESS_INITIAL_DELAY_SECS: i32 = 100;

// ============================================================================
// Replica Count Constants
// ============================================================================

/// Replica count used when `replicaCount` is empty
pub const DEFAULT_REPLICAS: i32 = 1;

// ============================================================================
// Helm Constants
// ============================================================================

/// Helm executable looked up on `PATH`
pub const HELM_BINARY: &str = "helm";
