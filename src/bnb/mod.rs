//! Exact branch-and-bound solver.
//!
//! Depth-first search over partial timelines with an explicit,
//! frame-structured work stack and trail-based undo (no recursion, no
//! timeline copies while backtracking). Admissible lower bounds, an
//! incumbent seeded by the greedy list scheduler, and empty-machine
//! symmetry breaking keep the tree small; an optional wall-clock budget
//! turns it into an anytime solver.
//!
//! # Modules
//!
//! - **`config`**: `BnbConfig`
//! - **`solver`**: `BranchAndBound`, the search session
//! - **`stack`** / **`state`**: work stack and undoable search state
//! - **`bounds`**: lower bounds
//! - **`incumbent`**, **`stats`**, **`time_limit`**: bookkeeping
//!
//! # References
//!
//! - Brucker (2007), "Scheduling Algorithms", Ch. 5
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

mod bounds;
mod config;
mod incumbent;
mod solver;
mod stack;
mod state;
mod stats;
mod time_limit;

pub use config::BnbConfig;
pub use solver::BranchAndBound;
pub use stats::BnbStatistics;
