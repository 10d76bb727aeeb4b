//! Makespan minimization for job chains on identical parallel machines.
//!
//! Every job is an ordered chain of tasks; every task runs uninterrupted on
//! any one machine, and a machine runs one task at a time. The crate builds
//! the earliest-finishing schedule with two solvers sharing one timeline
//! model: an exact branch-and-bound search and a cultural evolutionary
//! heuristic.
//!
//! # Modules
//!
//! - **`models`**: `ProblemModel`, `Job`, `Task`, `MachineId`, `Timeline`
//! - **`validation`**: input and schedule integrity checks
//! - **`dispatching`**: job ordering (`Lpt` rule, `RuleEngine`)
//! - **`scheduler`**: greedy list scheduler and `ScheduleMetrics`
//! - **`bnb`**: exact `BranchAndBound` solver
//! - **`cultural`**: `CulturalSolver` with belief-space guided nudges
//! - **`compare`**: run both solvers side by side
//! - **`generator`**: seeded random instances
//! - **`progress`** / **`outcome`**: callback payloads and result bundles
//!
//! # Example
//!
//! ```
//! use u_makespan::bnb::BranchAndBound;
//! use u_makespan::models::{Job, ProblemModel};
//!
//! let problem = ProblemModel::build(3, vec![Job::new(1).with_tasks([5, 3, 8])]).unwrap();
//! let outcome = BranchAndBound::new().solve(&problem).unwrap();
//! assert_eq!(outcome.makespan(), 16);
//! ```
//!
//! # Logging
//!
//! Solvers report through the `log` facade; install any logger to see it.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"

pub mod bnb;
pub mod compare;
pub mod cultural;
pub mod dispatching;
pub mod error;
pub mod generator;
pub mod models;
pub mod outcome;
pub mod progress;
pub mod scheduler;
pub mod validation;

pub use error::{Result, SolveError};
pub use outcome::{SolveOutcome, SolveStatus};
