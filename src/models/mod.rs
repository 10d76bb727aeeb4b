//! Scheduling domain models.
//!
//! Provides the data types for job-chain makespan problems and their
//! solutions.
//!
//! # Domain Mappings
//!
//! | u-makespan | Manufacturing | Computing | Logistics |
//! |------------|--------------|-----------|-----------|
//! | Job | Order routing | Pipeline | Shipment |
//! | Task | Operation | Stage | Transport leg |
//! | Machine | Work center | Core | Truck |
//! | Timeline | Production plan | Execution trace | Route plan |

mod problem;
mod task;
mod timeline;

pub use problem::{ProblemModel, ProblemSpec};
pub use task::{Job, JobId, Task, TaskKey, Time};
pub use timeline::{MachineId, ScheduledEntry, Timeline};
