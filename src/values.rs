// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Chart values: typed model, layering and `--set` handling.
//!
//! User values are layered onto the chart defaults the way Helm coalesces
//! them: mappings merge recursively, scalars and sequences replace, and an
//! explicit `null` removes the default entirely. Only the merged tree is
//! converted into [`ChartValues`].
//!
//! A key missing from the merged tree deserializes to the field type's empty
//! value, not to the chart default, because the chart templates render a
//! deleted key as empty too. [`ChartValues::default`] holds the chart's
//! shipped defaults for callers that build values by hand.

use crate::constants::{
    DEFAULT_IMAGE_PULL_POLICY, DEFAULT_IMAGE_REPOSITORY, DEFAULT_REPLICAS, DEFAULT_TIMEZONE,
    DEFAULT_VPN_TCP_PORT, DEFAULT_VPN_UDP_PORT, DEFAULT_VPN_UI_PORT,
};
use crate::errors::ChartError;
use k8s_openapi::api::core::v1::{
    Affinity, LocalObjectReference, PodSecurityContext, ResourceRequirements, SecurityContext,
    Toleration,
};
use schemars::JsonSchema;
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Typed values of the OpenVPN Access Server chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartValues {
    /// Number of pods; `0`, `""` and `null` mean one replica
    #[serde(default, deserialize_with = "deserialize_replica_count")]
    #[schemars(with = "Option<i32>")]
    pub replica_count: Option<i32>,

    #[serde(default)]
    pub image: ImageValues,

    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    /// Replaces the chart name in the name and full name
    #[serde(default)]
    pub name_override: Option<String>,

    /// Replaces the full name entirely
    #[serde(default)]
    pub full_name_override: Option<String>,

    #[serde(default)]
    pub service_account: ServiceAccountValues,

    #[serde(default, deserialize_with = "deserialize_string_map")]
    pub pod_annotations: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub pod_security_context: Option<PodSecurityContext>,

    /// Container security context; Access Server needs `NET_ADMIN` by default
    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub security_context: Option<SecurityContext>,

    #[serde(default)]
    pub service: ServiceValues,

    #[serde(default)]
    pub persistence: PersistenceValues,

    /// Value of the container's `TZ` variable
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, deserialize_with = "deserialize_string_map")]
    pub node_selector: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub tolerations: Vec<Toleration>,

    #[serde(default, deserialize_with = "deserialize_known_fields")]
    pub affinity: Option<Affinity>,
}

impl Default for ChartValues {
    fn default() -> Self {
        Self {
            replica_count: Some(DEFAULT_REPLICAS),
            image: ImageValues::default(),
            image_pull_secrets: Vec::new(),
            name_override: None,
            full_name_override: None,
            service_account: ServiceAccountValues {
                create: true,
                ..ServiceAccountValues::default()
            },
            pod_annotations: BTreeMap::new(),
            pod_security_context: None,
            security_context: None,
            service: ServiceValues::default(),
            persistence: PersistenceValues::default(),
            timezone: Some(DEFAULT_TIMEZONE.to_string()),
            resources: None,
            node_selector: BTreeMap::new(),
            tolerations: Vec::new(),
            affinity: None,
        }
    }
}

/// Container image settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageValues {
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub pull_policy: Option<String>,
    /// Image tag; empty means the chart `appVersion`
    #[serde(default)]
    pub tag: Option<String>,
}

impl Default for ImageValues {
    fn default() -> Self {
        Self {
            repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            pull_policy: Some(DEFAULT_IMAGE_PULL_POLICY.to_string()),
            tag: None,
        }
    }
}

/// Service account settings
///
/// A missing `create` means no service account, as in the chart's `if`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountValues {
    #[serde(default)]
    pub create: bool,
    #[serde(default, deserialize_with = "deserialize_string_map")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Ports Access Server listens on
///
/// Every port is required once `service` is given; the chart schema
/// requires them too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceValues {
    #[schemars(range(min = 1, max = 65535))]
    pub vpn_tcp_port: i32,
    #[schemars(range(min = 1, max = 65535))]
    pub vpn_udp_port: i32,
    #[schemars(range(min = 1, max = 65535))]
    pub vpn_ui_port: i32,
}

impl Default for ServiceValues {
    fn default() -> Self {
        Self {
            vpn_tcp_port: DEFAULT_VPN_TCP_PORT,
            vpn_udp_port: DEFAULT_VPN_UDP_PORT,
            vpn_ui_port: DEFAULT_VPN_UI_PORT,
        }
    }
}

/// Persistent storage settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceValues {
    /// Existing claim to mount instead of `<full-name>-data`
    #[serde(default)]
    pub existing_claim_name: Option<String>,
}

fn deserialize_replica_count<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::String(s) => s.parse::<i32>().map_err(de::Error::custom)?,
        Value::Number(n) => {
            let n = n
                .as_i64()
                .ok_or_else(|| de::Error::custom("replicaCount must be an integer"))?;
            i32::try_from(n).map_err(de::Error::custom)?
        }
        other => {
            return Err(de::Error::custom(format!(
                "replicaCount must be an integer, got {other:?}"
            )))
        }
    };
    Ok((count != 0).then_some(count))
}

/// Deserializes a Kubernetes type, rejecting keys the type does not know.
///
/// `k8s-openapi` silently ignores unknown fields, which would drop values the
/// chart's `toYaml` passes through unchanged.
fn deserialize_known_fields<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Serialize,
{
    let raw = Value::deserialize(deserializer)?;
    let typed: T = serde_yaml::from_value(raw.clone()).map_err(de::Error::custom)?;
    let known = serde_yaml::to_value(&typed).map_err(de::Error::custom)?;

    match first_unknown_key(&raw, &known, "") {
        Some(path) => Err(de::Error::custom(format!("unknown field `{path}`"))),
        None => Ok(typed),
    }
}

/// Dotted path of the first key of `raw` missing from `known`.
///
/// Keys with `null` values are skipped; they deserialize to absent fields.
fn first_unknown_key(raw: &Value, known: &Value, path: &str) -> Option<String> {
    match (raw, known) {
        (Value::Mapping(raw), Value::Mapping(known)) => {
            raw.iter().filter(|(_, v)| !v.is_null()).find_map(|(key, value)| {
                let name = scalar_to_string(key).unwrap_or_else(|| format!("{key:?}"));
                let child = if path.is_empty() {
                    name
                } else {
                    format!("{path}.{name}")
                };
                match known.get(key) {
                    Some(known_value) => first_unknown_key(value, known_value, &child),
                    None => Some(child),
                }
            })
        }
        (Value::Sequence(raw), Value::Sequence(known)) => raw
            .iter()
            .zip(known)
            .enumerate()
            .find_map(|(index, (value, known_value))| {
                first_unknown_key(value, known_value, &format!("{path}[{index}]"))
            }),
        _ => None,
    }
}

/// Renders a scalar the way `toYaml` prints it into a string field.
///
/// Whole floats lose their fraction (`2.0` becomes `"2"`). Returns `None`
/// for sequences, mappings and `null`.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            #[allow(clippy::cast_possible_truncation)]
            (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        }),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Deserializes a `map<string,string>`, stringifying scalar values.
///
/// Annotations and node selectors only carry strings on the API server;
/// `2`, `2.0` and `false` are accepted as their printed form.
fn deserialize_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mapping = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(BTreeMap::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(de::Error::custom(format!(
                "expected a mapping of strings, got {other:?}"
            )))
        }
    };

    let mut map = BTreeMap::new();
    for (key, value) in mapping {
        if value.is_null() {
            continue;
        }
        let key = scalar_to_string(&key)
            .ok_or_else(|| de::Error::custom(format!("invalid key {key:?}")))?;
        let value = scalar_to_string(&value).ok_or_else(|| {
            de::Error::custom(format!("value of `{key}` must be a scalar, got {value:?}"))
        })?;
        map.insert(key, value);
    }
    Ok(map)
}

impl ChartValues {
    /// Converts a merged values tree into typed values.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree does not match the chart's values model.
    pub fn from_value(values: Value) -> Result<Self, ChartError> {
        serde_yaml::from_value(values).map_err(|e| ChartError::InvalidValues {
            reason: e.to_string(),
        })
    }

    /// Coalesces each layer onto `defaults`, in order, then converts the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged tree does not match the chart's values model.
    pub fn from_layers(defaults: &Value, layers: &[Value]) -> Result<Self, ChartError> {
        let merged = layers
            .iter()
            .fold(defaults.clone(), |merged, layer| coalesce(&merged, layer));
        Self::from_value(merged)
    }

    /// Replica count, with empty values meaning one replica.
    #[must_use]
    pub fn replicas(&self) -> i32 {
        self.replica_count.unwrap_or(DEFAULT_REPLICAS)
    }

    /// `<repository>:<tag>`, falling back to `app_version` for an empty tag.
    #[must_use]
    pub fn image_reference(&self, app_version: &str) -> String {
        let tag = self
            .image
            .tag
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .unwrap_or(app_version);
        format!("{}:{tag}", self.image.repository)
    }
}

/// Merges `overrides` onto `base` the way Helm coalesces user values.
///
/// - Two mappings merge key by key, recursively.
/// - A `null` override removes the key from the result.
/// - Anything else in `overrides` replaces the base value.
#[must_use]
pub fn coalesce(base: &Value, overrides: &Value) -> Value {
    let (Value::Mapping(base), Value::Mapping(overrides)) = (base, overrides) else {
        return strip_nulls(overrides);
    };

    let mut merged = base.clone();
    for (key, value) in overrides {
        if value.is_null() {
            merged.remove(key);
            continue;
        }
        let next = match merged.get(key) {
            Some(existing) => coalesce(existing, value),
            None => strip_nulls(value),
        };
        merged.insert(key.clone(), next);
    }
    Value::Mapping(merged)
}

/// Drops `null` entries from mappings, recursively.
fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Applies one `--set` argument to `values`.
///
/// The argument holds one or more `path.to.key=value` assignments separated
/// by `,`; `\,` is a literal comma. Values are typed like Helm's `--set`:
/// `true`/`false` become booleans, `null` a null, base-10 integers without
/// a leading zero numbers, and everything else (floats included) stays a
/// string. Missing or non-mapping intermediate entries are replaced by
/// mappings.
///
/// # Errors
///
/// Returns an error if an assignment has no `=` or an empty key segment.
pub fn set_path(values: &mut Value, expression: &str) -> Result<(), ChartError> {
    for assignment in split_assignments(expression) {
        let invalid = || ChartError::InvalidSetExpression {
            expression: assignment.clone(),
        };

        let (path, raw) = assignment.split_once('=').ok_or_else(invalid)?;
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }

        insert_at(values, &segments, typed_set_value(raw));
    }
    Ok(())
}

/// Splits a `--set` argument on unescaped commas, unescaping `\,`.
fn split_assignments(expression: &str) -> Vec<String> {
    let mut assignments = Vec::new();
    let mut current = String::new();
    let mut chars = expression.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => assignments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    assignments.push(current);
    assignments
}

fn typed_set_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ if raw.len() > 1 && raw.starts_with('0') => Value::String(raw.to_string()),
        _ => raw
            .parse::<i64>()
            .map_or_else(|_| Value::String(raw.to_string()), Value::from),
    }
}

fn insert_at(values: &mut Value, segments: &[&str], parsed: Value) {
    if !values.is_mapping() {
        *values = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(mapping) = values else {
        return;
    };

    let key = Value::String(segments[0].to_string());
    if segments.len() == 1 {
        mapping.insert(key, parsed);
    } else {
        let child = mapping
            .entry(key)
            .or_insert(Value::Mapping(Mapping::new()));
        insert_at(child, &segments[1..], parsed);
    }
}

/// Builds one values layer out of `--set` expressions.
///
/// # Errors
///
/// Returns an error for the first malformed expression.
pub fn values_from_set_expressions<S: AsRef<str>>(expressions: &[S]) -> Result<Value, ChartError> {
    let mut values = Value::Mapping(Mapping::new());
    for expression in expressions {
        set_path(&mut values, expression.as_ref())?;
    }
    Ok(values)
}

/// Loads a user values file (`-f values.yaml`).
///
/// An empty file is an empty layer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a YAML mapping.
pub fn load_values_file(path: &Path) -> Result<Value, ChartError> {
    let contents = fs::read_to_string(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let values: Value = serde_yaml::from_str(&contents).map_err(|source| ChartError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    match values {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        Value::Mapping(_) => Ok(values),
        _ => Err(ChartError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
