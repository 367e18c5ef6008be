use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::jiff::Timestamp;
use std::collections::BTreeMap;

use crate::metrics;
use crate::model::{NOT_AVAILABLE, PodSnapshot, PodUsage, ResourceTotals};
use crate::status;

pub const PORT_FORWARD_MARK: &str = "●";

pub const READY_COLUMN: usize = 3;
pub const STATUS_COLUMN: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct HeaderColumn {
    pub name: &'static str,
    pub align_right: bool,
    pub wide: bool,
    pub mx: bool,
}

impl HeaderColumn {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            align_right: false,
            wide: false,
            mx: false,
        }
    }

    const fn right(mut self) -> Self {
        self.align_right = true;
        self
    }

    const fn wide(mut self) -> Self {
        self.wide = true;
        self
    }

    const fn mx(mut self) -> Self {
        self.mx = true;
        self
    }
}

pub fn header() -> Vec<HeaderColumn> {
    vec![
        HeaderColumn::new("NAMESPACE"),
        HeaderColumn::new("NAME"),
        HeaderColumn::new("PF"),
        HeaderColumn::new("READY"),
        HeaderColumn::new("RESTARTS").right(),
        HeaderColumn::new("STATUS"),
        HeaderColumn::new("CPU(R:L)").right().wide().mx(),
        HeaderColumn::new("MEM(R:L)").right().wide().mx(),
        HeaderColumn::new("CPU").right().mx(),
        HeaderColumn::new("MEM").right().mx(),
        HeaderColumn::new("%CPU/R").right().mx(),
        HeaderColumn::new("%MEM/R").right().mx(),
        HeaderColumn::new("%CPU/L").right().mx(),
        HeaderColumn::new("%MEM/L").right().mx(),
        HeaderColumn::new("IP"),
        HeaderColumn::new("NODE"),
        HeaderColumn::new("QOS").wide(),
        HeaderColumn::new("LABELS").wide(),
        HeaderColumn::new("VALID").wide(),
        HeaderColumn::new("AGE").right(),
    ]
}

pub fn row_fields(pod: &PodSnapshot, usage: Option<&PodUsage>, anchor: Timestamp) -> Vec<String> {
    let (ready, _, restarts) = status::container_tallies(&pod.container_statuses);
    let total = pod.container_statuses.len();
    let phase = status::phase(pod);
    let view = metrics::gather(pod, usage);
    let validity = status::diagnose(&phase, ready, total).unwrap_or_default();

    vec![
        pod.namespace.clone(),
        pod.name.clone(),
        PORT_FORWARD_MARK.to_string(),
        format!("{ready}/{total}"),
        restarts.to_string(),
        phase,
        to_resources_mc(view.totals.as_ref()),
        to_resources_mi(view.totals.as_ref()),
        view.current.cpu,
        view.current.mem,
        view.percentages.cpu_of_request,
        view.percentages.mem_of_request,
        view.percentages.cpu_of_limit,
        view.percentages.mem_of_limit,
        na(pod.pod_ip.as_deref()),
        na(pod.node_name.as_deref()),
        pod.qos_class.short_code().to_string(),
        labels_to_string(&pod.labels),
        validity,
        to_age(pod.created.as_ref(), anchor),
    ]
}

pub fn is_happy(ready_cell: &str) -> bool {
    let Some((ready, total)) = ready_cell.trim().split_once('/') else {
        return false;
    };
    match (ready.parse::<usize>(), total.parse::<usize>()) {
        (Ok(ready), Ok(total)) => ready == total && total > 0,
        _ => false,
    }
}

fn to_resources_mc(totals: Option<&ResourceTotals>) -> String {
    match totals {
        Some(totals) => format!(
            "{}:{}",
            totals.requests.cpu_millis, totals.limits.cpu_millis
        ),
        None => format!("{NOT_AVAILABLE}:{NOT_AVAILABLE}"),
    }
}

fn to_resources_mi(totals: Option<&ResourceTotals>) -> String {
    match totals {
        Some(totals) => format!(
            "{}:{}",
            metrics::to_mb(totals.requests.mem_bytes),
            metrics::to_mb(totals.limits.mem_bytes)
        ),
        None => format!("{NOT_AVAILABLE}:{NOT_AVAILABLE}"),
    }
}

fn na(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn labels_to_string(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn to_age(timestamp: Option<&Time>, anchor: Timestamp) -> String {
    let Some(timestamp) = timestamp else {
        return "-".to_string();
    };

    format_elapsed_seconds((anchor.as_second() - timestamp.0.as_second()).max(0))
}

fn format_elapsed_seconds(seconds: i64) -> String {
    if seconds >= 86_400 {
        return format!("{}d", seconds / 86_400);
    }

    if seconds >= 3_600 {
        return format!("{}h", seconds / 3_600);
    }

    if seconds >= 60 {
        return format!("{}m", seconds / 60);
    }

    format!("{seconds}s")
}
