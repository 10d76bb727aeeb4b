//! Cultural algorithm solver.
//!
//! A population of feasible schedules evolves under a shared belief space.
//! Individuals encode a task draw order plus a machine per task; the belief
//! space remembers the best schedule ever seen (situational knowledge) and
//! summarizes the current elite (normative knowledge: machine loads and
//! job/machine affinities). Each generation, individuals lagging behind the
//! best are nudged: one task moves from their most-loaded to their
//! least-loaded machine, chosen by elite affinity.
//!
//! # Modules
//!
//! - **`config`**: `CulturalConfig`
//! - **`individual`**: dual-vector encoding, decoding and the nudge operator
//! - **`belief`**: situational and normative knowledge
//! - **`solver`**: `CulturalSolver`, the generation loop
//! - **`stats`**: `CulturalStatistics`
//!
//! # References
//!
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

mod belief;
mod config;
mod individual;
mod solver;
mod stats;

pub use belief::{BeliefSpace, Normative, Situational};
pub use config::CulturalConfig;
pub use individual::Individual;
pub use solver::CulturalSolver;
pub use stats::CulturalStatistics;
