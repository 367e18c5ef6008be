use crate::model::{ContainerState, ContainerStatus, PodSnapshot};

pub const PENDING: &str = "Pending";
pub const RUNNING: &str = "Running";
pub const COMPLETED: &str = "Completed";
pub const TERMINATING: &str = "Terminating";
pub const UNKNOWN: &str = "Unknown";
pub const CONTAINER_CREATING: &str = "ContainerCreating";
pub const POD_INITIALIZING: &str = "PodInitializing";
pub const INITIALIZED: &str = "Initialized";

const NODE_LOST: &str = "NodeLost";

pub fn phase(pod: &PodSnapshot) -> String {
    let mut status = pod.phase.clone();
    if let Some(reason) = pod.reason.as_deref().filter(|reason| !reason.is_empty()) {
        if pod.deletion_requested && reason == NODE_LOST {
            return UNKNOWN.to_string();
        }
        status = reason.to_string();
    }

    if let Some(init_status) =
        init_container_phase(&pod.init_container_statuses, pod.init_containers.len())
    {
        return init_status;
    }

    let (status, saw_running) = container_phase(&pod.container_statuses, status);
    let status = if saw_running && status == COMPLETED {
        RUNNING.to_string()
    } else {
        status
    };

    if pod.deletion_requested {
        return TERMINATING.to_string();
    }

    status
}

// Scans from the last container toward index 0, overwriting unconditionally,
// so the lowest-indexed matching container determines the label.
fn container_phase(statuses: &[ContainerStatus], mut status: String) -> (String, bool) {
    let mut running = false;
    for container in statuses.iter().rev() {
        match &container.state {
            ContainerState::Waiting {
                reason: Some(reason),
            } if !reason.is_empty() => status = reason.clone(),
            ContainerState::Terminated {
                reason: Some(reason),
                ..
            } if !reason.is_empty() => status = reason.clone(),
            ContainerState::Terminated {
                exit_code, signal, ..
            } => {
                status = if *signal != 0 {
                    format!("Signal:{signal}")
                } else {
                    format!("ExitCode:{exit_code}")
                };
            }
            ContainerState::Running if container.ready => running = true,
            _ => {}
        }
    }

    (status, running)
}

fn init_container_phase(statuses: &[ContainerStatus], init_count: usize) -> Option<String> {
    statuses
        .iter()
        .enumerate()
        .find_map(|(index, container)| init_container_label(container, index, init_count))
}

fn init_container_label(
    container: &ContainerStatus,
    index: usize,
    init_count: usize,
) -> Option<String> {
    match &container.state {
        ContainerState::Terminated { exit_code: 0, .. } => None,
        ContainerState::Terminated {
            reason: Some(reason),
            ..
        } if !reason.is_empty() => Some(format!("Init:{reason}")),
        ContainerState::Terminated {
            exit_code, signal, ..
        } => Some(if *signal != 0 {
            format!("Init:Signal:{signal}")
        } else {
            format!("Init:ExitCode:{exit_code}")
        }),
        ContainerState::Waiting {
            reason: Some(reason),
        } if !reason.is_empty() && reason != POD_INITIALIZING => Some(format!("Init:{reason}")),
        _ => Some(format!("Init:{index}/{init_count}")),
    }
}

pub fn diagnose(phase: &str, ready: usize, total: usize) -> Option<String> {
    if phase == COMPLETED {
        return None;
    }
    if ready != total || total == 0 {
        return Some(format!("container ready check failed: {ready} of {total}"));
    }

    None
}

pub fn container_tallies(statuses: &[ContainerStatus]) -> (usize, usize, i64) {
    let ready = statuses.iter().filter(|container| container.ready).count();
    let terminated = statuses
        .iter()
        .filter(|container| container.state.is_terminated())
        .count();
    let restarts = statuses
        .iter()
        .map(|container| container.restart_count)
        .sum();

    (ready, terminated, restarts)
}
