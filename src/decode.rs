use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{
    Container, ContainerState as KubeContainerState, ContainerStatus as KubeContainerStatus, Pod,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{
    ContainerSpec, ContainerState, ContainerStatus, ContainerUsage, PodSnapshot, PodUsage,
    QosClass, ResourceQuantity,
};
use crate::status::UNKNOWN;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a valid pod object: {0}")]
    Pod(#[source] serde_json::Error),
    #[error("not a valid pod metrics object: {0}")]
    Metrics(#[source] serde_json::Error),
    #[error("container {container}: malformed {kind} quantity {value:?}")]
    Quantity {
        container: String,
        kind: &'static str,
        value: String,
    },
}

pub fn parse_items(raw: &str) -> Result<Vec<Value>> {
    let document: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            serde_yaml::from_str(raw).context("input is neither valid JSON nor valid YAML")?
        }
    };

    Ok(split_items(document))
}

fn split_items(document: Value) -> Vec<Value> {
    match document {
        Value::Object(mut fields) if fields.contains_key("items") => {
            match fields.remove("items") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other],
            }
        }
        Value::Array(items) => items,
        other => vec![other],
    }
}

pub fn pod_snapshot(value: Value) -> Result<PodSnapshot, DecodeError> {
    let pod: Pod = serde_json::from_value(value).map_err(DecodeError::Pod)?;
    let spec = pod.spec.unwrap_or_default();
    let status = pod.status.unwrap_or_default();

    let containers = container_specs(&spec.containers)?;
    let init_containers = container_specs(spec.init_containers.as_deref().unwrap_or(&[]))?;
    let container_statuses_result =
        container_statuses(status.container_statuses.as_deref().unwrap_or(&[]));
    let init_container_statuses_result =
        container_statuses(status.init_container_statuses.as_deref().unwrap_or(&[]));

    Ok(PodSnapshot {
        namespace: pod.metadata.namespace.unwrap_or_default(),
        name: pod.metadata.name.unwrap_or_default(),
        phase: status.phase.unwrap_or_else(|| UNKNOWN.to_string()),
        reason: status.reason.filter(|reason| !reason.is_empty()),
        deletion_requested: pod.metadata.deletion_timestamp.is_some(),
        containers,
        init_containers,
        container_statuses: container_statuses_result,
        init_container_statuses: init_container_statuses_result,
        pod_ip: status.pod_ip.filter(|value| !value.is_empty()),
        node_name: spec.node_name.filter(|value| !value.is_empty()),
        qos_class: QosClass::from_wire(status.qos_class.as_deref()),
        labels: pod.metadata.labels.unwrap_or_default(),
        created: pod.metadata.creation_timestamp,
    })
}

fn container_specs(containers: &[Container]) -> Result<Vec<ContainerSpec>, DecodeError> {
    containers.iter().map(container_spec).collect()
}

fn container_spec(container: &Container) -> Result<ContainerSpec, DecodeError> {
    let resources = container.resources.clone().unwrap_or_default();
    Ok(ContainerSpec {
        name: container.name.clone(),
        requests: quantity_pair(resources.requests.as_ref(), &container.name, "request")?,
        limits: quantity_pair(resources.limits.as_ref(), &container.name, "limit")?,
    })
}

fn quantity_pair(
    declared: Option<&BTreeMap<String, Quantity>>,
    container: &str,
    kind: &'static str,
) -> Result<Option<ResourceQuantity>, DecodeError> {
    let Some(declared) = declared.filter(|declared| !declared.is_empty()) else {
        return Ok(None);
    };

    let cpu = match declared.get("cpu") {
        Some(quantity) => {
            parse_cpu_millicores(&quantity.0).ok_or_else(|| DecodeError::Quantity {
                container: container.to_string(),
                kind,
                value: quantity.0.clone(),
            })?
        }
        None => 0,
    };
    let mem = match declared.get("memory") {
        Some(quantity) => parse_memory_bytes(&quantity.0).ok_or_else(|| DecodeError::Quantity {
            container: container.to_string(),
            kind,
            value: quantity.0.clone(),
        })?,
        None => 0,
    };

    Ok(Some(ResourceQuantity::new(cpu, mem)))
}

fn container_statuses(statuses: &[KubeContainerStatus]) -> Vec<ContainerStatus> {
    statuses.iter().map(container_status).collect()
}

fn container_status(status: &KubeContainerStatus) -> ContainerStatus {
    ContainerStatus {
        name: status.name.clone(),
        ready: status.ready,
        restart_count: i64::from(status.restart_count),
        state: container_state(status.state.as_ref()),
    }
}

fn container_state(state: Option<&KubeContainerState>) -> ContainerState {
    let Some(state) = state else {
        return ContainerState::Absent;
    };

    if state.running.is_some() {
        return ContainerState::Running;
    }
    if let Some(waiting) = state.waiting.as_ref() {
        return ContainerState::Waiting {
            reason: waiting.reason.clone().filter(|reason| !reason.is_empty()),
        };
    }
    if let Some(terminated) = state.terminated.as_ref() {
        return ContainerState::Terminated {
            reason: terminated.reason.clone().filter(|reason| !reason.is_empty()),
            exit_code: terminated.exit_code,
            signal: terminated.signal.unwrap_or(0),
        };
    }

    ContainerState::Absent
}

#[derive(Debug, Clone, Deserialize)]
struct PodMetricsDoc {
    #[serde(default)]
    metadata: MetricsMetadata,
    #[serde(default)]
    containers: Vec<ContainerMetricsDoc>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct MetricsMetadata {
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ContainerMetricsDoc {
    #[serde(default)]
    name: String,
    #[serde(default)]
    usage: UsageDoc,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct UsageDoc {
    #[serde(default)]
    cpu: String,
    #[serde(default)]
    memory: String,
}

// Usage quantities are advisory: a value that fails to parse degrades to
// zero instead of invalidating the row.
pub fn pod_usage(value: Value) -> Result<(String, PodUsage), DecodeError> {
    let doc: PodMetricsDoc = serde_json::from_value(value).map_err(DecodeError::Metrics)?;
    let key = format!("{}/{}", doc.metadata.namespace, doc.metadata.name);
    let containers = doc
        .containers
        .into_iter()
        .map(|container| ContainerUsage {
            name: container.name,
            cpu_millis: parse_cpu_millicores(&container.usage.cpu).unwrap_or(0),
            mem_bytes: parse_memory_bytes(&container.usage.memory).unwrap_or(0),
        })
        .collect();

    Ok((key, PodUsage { containers }))
}

pub fn parse_cpu_millicores(value: &str) -> Option<i64> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    let (number, multiplier) = if let Some(number) = raw.strip_suffix('m') {
        (number, 1.0)
    } else if let Some(number) = raw.strip_suffix('u') {
        (number, 0.001)
    } else if let Some(number) = raw.strip_suffix('n') {
        (number, 0.000001)
    } else {
        (raw, 1000.0)
    };

    let numeric = number.parse::<f64>().ok()?;
    let millicores = (numeric * multiplier).round();
    if !millicores.is_finite() || millicores < 0.0 {
        return None;
    }
    Some(millicores as i64)
}

pub fn parse_memory_bytes(value: &str) -> Option<i64> {
    const BINARY_UNITS: [(&str, f64); 6] = [
        ("Ei", 1_152_921_504_606_846_976.0),
        ("Pi", 1_125_899_906_842_624.0),
        ("Ti", 1_099_511_627_776.0),
        ("Gi", 1_073_741_824.0),
        ("Mi", 1_048_576.0),
        ("Ki", 1_024.0),
    ];
    const DECIMAL_UNITS: [(&str, f64); 6] = [
        ("E", 1_000_000_000_000_000_000.0),
        ("P", 1_000_000_000_000_000.0),
        ("T", 1_000_000_000_000.0),
        ("G", 1_000_000_000.0),
        ("M", 1_000_000.0),
        ("K", 1_000.0),
    ];

    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    for (suffix, multiplier) in BINARY_UNITS {
        if let Some(number) = raw.strip_suffix(suffix) {
            let numeric = number.parse::<f64>().ok()?;
            let bytes = (numeric * multiplier).round();
            if !bytes.is_finite() || bytes < 0.0 {
                return None;
            }
            return Some(bytes as i64);
        }
    }

    for (suffix, multiplier) in DECIMAL_UNITS {
        if let Some(number) = raw.strip_suffix(suffix) {
            let numeric = number.parse::<f64>().ok()?;
            let bytes = (numeric * multiplier).round();
            if !bytes.is_finite() || bytes < 0.0 {
                return None;
            }
            return Some(bytes as i64);
        }
    }

    if let Some(number) = raw.strip_suffix('m') {
        let numeric = number.parse::<f64>().ok()?;
        let bytes = (numeric * 0.001).round();
        if !bytes.is_finite() || bytes < 0.0 {
            return None;
        }
        return Some(bytes as i64);
    }

    let bytes = raw.parse::<f64>().ok()?;
    if !bytes.is_finite() || bytes < 0.0 {
        return None;
    }
    Some(bytes.round() as i64)
}
