use crate::model::{NOT_AVAILABLE, PodSnapshot, PodUsage, ResourceTotals};
use crate::resources;

const MEGABYTE: i64 = 1024 * 1024;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CurrentMetrics {
    pub cpu: String,
    pub mem: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PercentMetrics {
    pub cpu_of_request: String,
    pub mem_of_request: String,
    pub cpu_of_limit: String,
    pub mem_of_limit: String,
}

#[derive(Debug, Clone)]
pub struct PodMetricsView {
    pub current: CurrentMetrics,
    pub percentages: PercentMetrics,
    pub totals: Option<ResourceTotals>,
}

pub fn gather(pod: &PodSnapshot, usage: Option<&PodUsage>) -> PodMetricsView {
    let Some(usage) = usage else {
        return PodMetricsView {
            current: no_current(),
            percentages: no_percentages(),
            totals: None,
        };
    };

    let (cpu, mem) = current_usage(usage);
    let totals = resources::pod_totals(pod);

    PodMetricsView {
        current: CurrentMetrics {
            cpu: to_mc(cpu),
            mem: to_mi(to_mb(mem)),
        },
        percentages: PercentMetrics {
            cpu_of_request: percentage(cpu, totals.requests.cpu_millis),
            mem_of_request: percentage(to_mb(mem), to_mb(totals.requests.mem_bytes)),
            cpu_of_limit: percentage(cpu, totals.limits.cpu_millis),
            mem_of_limit: percentage(to_mb(mem), to_mb(totals.limits.mem_bytes)),
        },
        totals: Some(totals),
    }
}

// The snapshot is trusted as already scoped to this pod: every entry is
// summed, with no matching of entry names against the declared containers.
pub fn current_usage(usage: &PodUsage) -> (i64, i64) {
    usage
        .containers
        .iter()
        .fold((0i64, 0i64), |(cpu, mem), container| {
            (
                cpu.saturating_add(container.cpu_millis),
                mem.saturating_add(container.mem_bytes),
            )
        })
}

fn percentage(value: i64, total: i64) -> String {
    if total == 0 {
        return NOT_AVAILABLE.to_string();
    }

    (value.saturating_mul(100) / total).to_string()
}

pub fn to_mb(bytes: i64) -> i64 {
    bytes / MEGABYTE
}

pub fn to_mc(millicores: i64) -> String {
    millicores.to_string()
}

pub fn to_mi(megabytes: i64) -> String {
    megabytes.to_string()
}

fn no_current() -> CurrentMetrics {
    CurrentMetrics {
        cpu: NOT_AVAILABLE.to_string(),
        mem: NOT_AVAILABLE.to_string(),
    }
}

fn no_percentages() -> PercentMetrics {
    PercentMetrics {
        cpu_of_request: NOT_AVAILABLE.to_string(),
        mem_of_request: NOT_AVAILABLE.to_string(),
        cpu_of_limit: NOT_AVAILABLE.to_string(),
        mem_of_limit: NOT_AVAILABLE.to_string(),
    }
}
