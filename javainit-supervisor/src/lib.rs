//! Pidfile-based supervisor for a single detached JVM service.

mod error;
pub mod lock;
pub mod paths;
pub mod pidfile;
pub mod process;
mod supervisor;

pub use error::{PidfileError, ProcessError, SupervisorError};
pub use paths::{SupervisorConfig, SupervisorPaths};
pub use pidfile::PidfileStore;
pub use supervisor::{StartOutcome, Status, StopOutcome, Supervisor, EXIT_FAILURE};
