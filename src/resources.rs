// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! OpenVPN Access Server Kubernetes resource builders
//!
//! This module builds the resources the chart renders (`Deployment`,
//! `ServiceAccount`) directly from typed values. All functions are pure and
//! easily testable; the output mirrors `templates/deployment.yaml` and
//! `templates/serviceaccount.yaml`.

use crate::constants::{
    ENV_TIMEZONE, LIVENESS_INITIAL_DELAY_SECS, LIVENESS_TIMEOUT_SECS, PERSISTENCE_CLAIM_SUFFIX,
    PERSISTENCE_MOUNT_PATH, PORT_NAME_VPN_TCP, PORT_NAME_VPN_UDP, PORT_NAME_VPN_UI,
    READINESS_INITIAL_DELAY_SECS, SACLI_PATH, SACLI_STATUS_COMMAND, VOLUME_PERSISTENCE,
};
use crate::names::{ReleaseContext, ResolvedNames};
use crate::values::{ChartValues, ServiceValues};
use k8s_openapi::api::{
    apps::v1::{Deployment, DeploymentSpec},
    core::v1::{
        Container, ContainerPort, EnvVar, ExecAction, PersistentVolumeClaimVolumeSource, PodSpec,
        PodTemplateSpec, Probe, ServiceAccount, TCPSocketAction, Volume, VolumeMount,
    },
};
use k8s_openapi::apimachinery::pkg::{
    apis::meta::v1::{LabelSelector, ObjectMeta},
    util::intstr::IntOrString,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Keeps `value` only when it differs from the type's empty value.
///
/// `{}` in `values.yaml` deserializes to `Some(Default::default())`; the
/// chart's `with` blocks skip those, so the builders do too.
fn non_empty<T: Clone + Default + PartialEq>(value: Option<&T>) -> Option<T> {
    value.filter(|v| **v != T::default()).cloned()
}

fn non_empty_map(map: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    (!map.is_empty()).then(|| map.clone())
}

fn non_empty_vec<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

/// Name of the claim backing the persistence volume.
///
/// `persistence.existingClaimName` when set, `<full-name>-data` otherwise.
#[must_use]
pub fn persistence_claim_name(values: &ChartValues, full_name: &str) -> String {
    values
        .persistence
        .existing_claim_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map_or_else(
            || format!("{full_name}-{PERSISTENCE_CLAIM_SUFFIX}"),
            str::to_string,
        )
}

/// Builds a Kubernetes Deployment for running OpenVPN Access Server.
///
/// Creates a Deployment with:
/// - `metadata.name` set to the release's full name and the full label set
/// - selector and pod template labels set to the selector labels only
/// - a single Access Server container exposing the VPN and UI ports
/// - liveness (`sacli Status`) and readiness (UI TCP socket) probes
/// - a `persistence` volume backed by a `PersistentVolumeClaim`
///
/// Optional pod and container fields are only set when their values are non-empty.
///
/// # Arguments
///
/// * `ctx` - Release name, namespace and chart metadata
/// * `values` - Chart values, already coalesced onto the chart defaults
///
/// # Returns
///
/// A Kubernetes Deployment resource equivalent to the chart's rendered template
#[must_use]
pub fn build_deployment(ctx: &ReleaseContext, values: &ChartValues) -> Deployment {
    let names = ResolvedNames::resolve(ctx, values);
    let replicas = values.replicas();

    debug!(
        release = %ctx.release_name,
        full_name = %names.full_name,
        replicas,
        "Building Deployment"
    );

    Deployment {
        metadata: ObjectMeta {
            name: Some(names.full_name.clone()),
            namespace: ctx.namespace.clone(),
            labels: Some(names.labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_labels: Some(names.selector_labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    annotations: non_empty_map(&values.pod_annotations),
                    labels: Some(names.selector_labels.clone()),
                    ..Default::default()
                }),
                spec: Some(build_pod_spec(ctx, values, &names)),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Builds the pod specification: one container, the persistence volume and
/// whichever scheduling fields are configured.
fn build_pod_spec(ctx: &ReleaseContext, values: &ChartValues, names: &ResolvedNames) -> PodSpec {
    PodSpec {
        containers: vec![build_container(ctx, values)],
        service_account_name: Some(names.service_account_name.clone()),
        image_pull_secrets: non_empty_vec(&values.image_pull_secrets),
        security_context: non_empty(values.pod_security_context.as_ref()),
        node_selector: non_empty_map(&values.node_selector),
        affinity: non_empty(values.affinity.as_ref()),
        tolerations: non_empty_vec(&values.tolerations),
        volumes: Some(build_volumes(values, &names.full_name)),
        ..Default::default()
    }
}

fn build_container(ctx: &ReleaseContext, values: &ChartValues) -> Container {
    Container {
        name: ctx.chart.name.clone(),
        image: Some(values.image_reference(ctx.app_version())),
        image_pull_policy: values.image.pull_policy.clone(),
        env: Some(vec![EnvVar {
            name: ENV_TIMEZONE.into(),
            value: values.timezone.clone(),
            ..Default::default()
        }]),
        ports: Some(build_container_ports(&values.service)),
        liveness_probe: Some(build_liveness_probe()),
        readiness_probe: Some(build_readiness_probe(values.service.vpn_ui_port)),
        resources: non_empty(values.resources.as_ref()),
        security_context: non_empty(values.security_context.as_ref()),
        volume_mounts: Some(build_volume_mounts()),
        ..Default::default()
    }
}

/// VPN over TCP, VPN over UDP and the web UI, in that order.
#[must_use]
pub fn build_container_ports(service: &ServiceValues) -> Vec<ContainerPort> {
    [
        (PORT_NAME_VPN_TCP, service.vpn_tcp_port, "TCP"),
        (PORT_NAME_VPN_UDP, service.vpn_udp_port, "UDP"),
        (PORT_NAME_VPN_UI, service.vpn_ui_port, "TCP"),
    ]
    .into_iter()
    .map(|(name, port, protocol)| ContainerPort {
        name: Some(name.into()),
        container_port: port,
        protocol: Some(protocol.into()),
        ..Default::default()
    })
    .collect()
}

/// Liveness probe asking Access Server for its status via `sacli`.
#[must_use]
pub fn build_liveness_probe() -> Probe {
    Probe {
        exec: Some(ExecAction {
            command: Some(vec![SACLI_PATH.into(), SACLI_STATUS_COMMAND.into()]),
        }),
        initial_delay_seconds: Some(LIVENESS_INITIAL_DELAY_SECS),
        timeout_seconds: Some(LIVENESS_TIMEOUT_SECS),
        ..Default::default()
    }
}

/// Readiness probe: the web UI accepts TCP connections.
#[must_use]
pub fn build_readiness_probe(ui_port: i32) -> Probe {
    Probe {
        tcp_socket: Some(TCPSocketAction {
            port: IntOrString::Int(ui_port),
            ..Default::default()
        }),
        initial_delay_seconds: Some(READINESS_INITIAL_DELAY_SECS),
        ..Default::default()
    }
}

fn build_volume_mounts() -> Vec<VolumeMount> {
    vec![VolumeMount {
        name: VOLUME_PERSISTENCE.into(),
        mount_path: PERSISTENCE_MOUNT_PATH.into(),
        ..Default::default()
    }]
}

fn build_volumes(values: &ChartValues, full_name: &str) -> Vec<Volume> {
    vec![Volume {
        name: VOLUME_PERSISTENCE.into(),
        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
            claim_name: persistence_claim_name(values, full_name),
            ..Default::default()
        }),
        ..Default::default()
    }]
}

/// Builds the `ServiceAccount` pods run as, when the chart creates one.
///
/// # Returns
///
/// `None` when `serviceAccount.create` is false
#[must_use]
pub fn build_service_account(ctx: &ReleaseContext, values: &ChartValues) -> Option<ServiceAccount> {
    if !values.service_account.create {
        debug!(release = %ctx.release_name, "ServiceAccount creation disabled");
        return None;
    }

    let names = ResolvedNames::resolve(ctx, values);
    Some(ServiceAccount {
        metadata: ObjectMeta {
            name: Some(names.service_account_name),
            namespace: ctx.namespace.clone(),
            labels: Some(names.labels),
            annotations: non_empty_map(&values.service_account.annotations),
            ..Default::default()
        },
        ..Default::default()
    })
}
