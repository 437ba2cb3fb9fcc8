//! # emsim-schema: Simulation Configuration Schema
//!
//! The fixed schema of an emsim simulation document: one validator per
//! section, built on the [`emsim_core::Section`] reader.
//!
//! ## Sections
//!
//! - [`problem`]: simulation type and run metadata.
//! - [`model`]: mesh source, units and refinement regions.
//! - [`domains`]: materials and domain postprocessing, with the
//!   postprocessing-to-material cross-reference check.
//! - [`boundaries`]: boundary conditions, ports, surface currents and
//!   boundary postprocessing.
//! - [`solver`]: per-simulation-type solver settings and the linear solver.
//!
//! [`SimulationConfig::from_value`] composes them in a fixed order and
//! [`load_config`] reads a JSON or YAML file first.
//!
//! ## Crate Policy
//!
//! - Depends only on `emsim-core` internally.
//! - The schema is compiled in; there are no external schema files.
//! - Every key a document may contain is listed in a static allowlist next
//!   to the validator that reads it.

pub mod boundaries;
pub mod config;
pub mod domains;
pub mod load;
pub mod model;
mod nodes;
pub mod problem;
pub mod solver;

pub use boundaries::BoundaryData;
pub use config::{SimulationConfig, TOP_LEVEL_KEYS};
pub use domains::DomainData;
pub use load::{load_config, parse_document, DocumentFormat, LoadError};
pub use model::ModelData;
pub use nodes::Node;
pub use problem::ProblemData;
pub use solver::SolverData;
