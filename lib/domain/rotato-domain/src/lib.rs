//! Domain models and invariants for rolling cluster maintenance.

pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod maintenance;
pub mod policy;
pub mod report;
pub mod run;
pub mod target;

pub use config::{
    ConvergenceConfig, RotatoConfig, RunnerConfig, StorageClusterRef, WorkloadsConfig,
};
pub use error::{ConfigError, ConvergenceTimeout, RunError};
pub use events::{Event, EventBus, EventLevel, now_millis};
pub use health::{HealthVerdict, ProbeKind};
pub use maintenance::{ActionFailure, MaintenanceKind, MaintenanceOutcome};
pub use policy::ConvergencePolicy;
pub use report::RunReport;
pub use run::{RunPhase, RunState};
pub use target::{Target, TargetOrigin, build_target_list};
