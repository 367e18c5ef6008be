use crate::model::{ContainerSpec, PodSnapshot, ResourceQuantity, ResourceTotals};

pub fn pod_totals(pod: &PodSnapshot) -> ResourceTotals {
    ResourceTotals {
        requests: pod_requests(pod),
        limits: pod_limits(pod),
    }
}

pub fn pod_requests(pod: &PodSnapshot) -> ResourceQuantity {
    let mut total = scope_requests(&pod.containers);
    total.add(scope_requests(&pod.init_containers));
    total
}

pub fn pod_limits(pod: &PodSnapshot) -> ResourceQuantity {
    let mut total = scope_limits(&pod.containers);
    total.add(scope_limits(&pod.init_containers));
    total
}

pub fn scope_requests(containers: &[ContainerSpec]) -> ResourceQuantity {
    scope_total(containers, container_resources)
}

pub fn scope_limits(containers: &[ContainerSpec]) -> ResourceQuantity {
    scope_total(containers, container_limits)
}

// A container with no defined quantity poisons the whole scope: the running
// total resets to zero and the scan stops, never reporting a partial sum.
fn scope_total(
    containers: &[ContainerSpec],
    extract: fn(&ContainerSpec) -> Option<ResourceQuantity>,
) -> ResourceQuantity {
    let mut total = ResourceQuantity::default();
    for container in containers {
        let Some(declared) = extract(container) else {
            total.reset();
            break;
        };
        total.add(declared);
    }

    total
}

fn container_resources(container: &ContainerSpec) -> Option<ResourceQuantity> {
    container.requests.or(container.limits)
}

fn container_limits(container: &ContainerSpec) -> Option<ResourceQuantity> {
    container.limits
}

#[cfg(test)]
mod tests {
    use super::{pod_limits, pod_requests, scope_limits, scope_requests};
    use crate::model::{ContainerSpec, PodSnapshot, ResourceQuantity};

    fn container(
        name: &str,
        requests: Option<(i64, i64)>,
        limits: Option<(i64, i64)>,
    ) -> ContainerSpec {
        ContainerSpec {
            name: name.to_string(),
            requests: requests.map(|(cpu, mem)| ResourceQuantity::new(cpu, mem)),
            limits: limits.map(|(cpu, mem)| ResourceQuantity::new(cpu, mem)),
        }
    }

    #[test]
    fn fully_declared_scope_sums_requests() {
        let containers = vec![
            container("a", Some((100, 1_048_576)), None),
            container("b", Some((250, 2_097_152)), None),
        ];
        assert_eq!(
            scope_requests(&containers),
            ResourceQuantity::new(350, 3_145_728)
        );
    }

    #[test]
    fn scope_request_sum_is_order_independent() {
        let forward = vec![
            container("a", Some((100, 1_000_000)), None),
            container("b", Some((200, 3_000_000)), None),
            container("c", Some((300, 5_000_000)), None),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(scope_requests(&forward), scope_requests(&reversed));
    }

    #[test]
    fn undeclared_container_resets_the_whole_scope() {
        let containers = vec![
            container("a", Some((100, 1_048_576)), None),
            container("b", None, None),
            container("c", Some((999, 999)), None),
        ];
        assert_eq!(scope_requests(&containers), ResourceQuantity::default());
    }

    #[test]
    fn requests_fall_back_to_limits_per_container() {
        let containers = vec![
            container("a", Some((100, 1_048_576)), None),
            container("b", None, Some((400, 4_194_304))),
        ];
        assert_eq!(
            scope_requests(&containers),
            ResourceQuantity::new(500, 5_242_880)
        );
    }

    #[test]
    fn limits_never_fall_back_to_requests() {
        let containers = vec![
            container("a", Some((100, 1_048_576)), Some((200, 2_097_152))),
            container("b", Some((50, 1)), None),
        ];
        assert_eq!(scope_limits(&containers), ResourceQuantity::default());
    }

    #[test]
    fn fully_limited_scope_sums_limits() {
        let containers = vec![
            container("a", None, Some((200, 2_097_152))),
            container("b", Some((50, 1)), Some((300, 1_048_576))),
        ];
        assert_eq!(
            scope_limits(&containers),
            ResourceQuantity::new(500, 3_145_728)
        );
    }

    #[test]
    fn pod_totals_add_both_scopes() {
        let pod = PodSnapshot {
            containers: vec![container("main", Some((100, 1_048_576)), None)],
            init_containers: vec![container("init", Some((25, 524_288)), None)],
            ..PodSnapshot::default()
        };
        assert_eq!(pod_requests(&pod), ResourceQuantity::new(125, 1_572_864));
    }

    #[test]
    fn reset_in_one_scope_still_counts_the_other() {
        let pod = PodSnapshot {
            containers: vec![
                container("main", Some((100, 1_048_576)), None),
                container("sidecar", None, None),
            ],
            init_containers: vec![container("init", Some((25, 524_288)), None)],
            ..PodSnapshot::default()
        };
        assert_eq!(pod_requests(&pod), ResourceQuantity::new(25, 524_288));
    }

    #[test]
    fn empty_pod_aggregates_to_zero() {
        let pod = PodSnapshot::default();
        assert_eq!(pod_requests(&pod), ResourceQuantity::default());
        assert_eq!(pod_limits(&pod), ResourceQuantity::default());
    }
}
