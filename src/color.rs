use crate::status::{
    COMPLETED, CONTAINER_CREATING, INITIALIZED, PENDING, POD_INITIALIZING, RUNNING, TERMINATING,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StatusColor {
    Pending,
    Creating,
    Highlight,
    Completed,
    Standard,
    Error,
    Kill,
}

pub fn color_for(status: &str, happy: bool) -> StatusColor {
    match status.trim() {
        PENDING => StatusColor::Pending,
        CONTAINER_CREATING | POD_INITIALIZING => StatusColor::Creating,
        INITIALIZED => StatusColor::Highlight,
        COMPLETED => StatusColor::Completed,
        RUNNING if happy => StatusColor::Standard,
        RUNNING => StatusColor::Error,
        TERMINATING => StatusColor::Kill,
        _ if happy => StatusColor::Standard,
        _ => StatusColor::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::{StatusColor, color_for};

    #[test]
    fn known_statuses_map_to_their_categories() {
        assert_eq!(color_for("Pending", true), StatusColor::Pending);
        assert_eq!(color_for("ContainerCreating", true), StatusColor::Creating);
        assert_eq!(color_for("PodInitializing", true), StatusColor::Creating);
        assert_eq!(color_for("Initialized", true), StatusColor::Highlight);
        assert_eq!(color_for("Completed", true), StatusColor::Completed);
        assert_eq!(color_for("Terminating", true), StatusColor::Kill);
    }

    #[test]
    fn running_depends_on_the_readiness_verdict() {
        assert_eq!(color_for("Running", true), StatusColor::Standard);
        assert_eq!(color_for("Running", false), StatusColor::Error);
    }

    #[test]
    fn unrecognized_statuses_fall_back_on_the_verdict() {
        assert_eq!(color_for("CrashLoopBackOff", true), StatusColor::Standard);
        assert_eq!(color_for("CrashLoopBackOff", false), StatusColor::Error);
        assert_eq!(color_for("Init:0/2", false), StatusColor::Error);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(color_for("  Pending  ", false), StatusColor::Pending);
    }
}
