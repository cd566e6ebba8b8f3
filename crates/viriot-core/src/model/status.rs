use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Status
///
/// Lifecycle state of a thing visor, silo or flavour.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[display("pending")]
    Pending,
    #[display("running")]
    Running,
    #[display("stopping")]
    Stopping,
    #[display("stopped")]
    Stopped,
    #[display("shutting_down")]
    ShuttingDown,
    #[display("terminated")]
    Terminated,
    #[display("ready")]
    Ready,
    #[display("error")]
    Error,
}

impl Status {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}
