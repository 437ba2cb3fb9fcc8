//! # Problem Section
//!
//! `Problem` selects the simulation type and carries run metadata. The
//! simulation type also decides which `Solver` subsection is mandatory;
//! that check runs after every section has been validated.

use emsim_core::{ConfigError, ProblemType, Section};
use serde::Serialize;

use crate::solver::SolverData;

pub(crate) const PROBLEM_KEYS: &[&str] = &["Type", "Verbose", "Output"];

/// Problem metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemData {
    /// Simulation type.
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    /// Verbosity level of the solver driver.
    pub verbose: i32,
    /// Output directory for results.
    pub output: String,
}

impl ProblemData {
    /// Validate the required `Problem` section of `root`.
    pub(crate) fn parse(root: &Section<'_>) -> Result<Self, ConfigError> {
        let problem = root.required_subsection("Problem", PROBLEM_KEYS)?;
        let data = Self {
            problem_type: problem.required_enum("Type")?,
            verbose: problem.optional("Verbose", 1)?,
            output: problem.optional("Output", String::new())?,
        };
        problem.finish()?;
        tracing::debug!(
            problem_type = %data.problem_type,
            verbose = data.verbose,
            output = %data.output,
            "parsed Problem"
        );
        Ok(data)
    }

    /// Check that the solver subsection required by the problem type exists.
    ///
    /// Electrostatic and magnetostatic problems run with solver defaults.
    pub(crate) fn check_solver(&self, solver: &SolverData) -> Result<(), ConfigError> {
        let present = match self.problem_type {
            ProblemType::Driven => solver.driven.is_some(),
            ProblemType::Eigenmode => solver.eigenmode.is_some(),
            ProblemType::Transient => solver.transient.is_some(),
            ProblemType::Electrostatic | ProblemType::Magnetostatic => true,
        };
        if present {
            Ok(())
        } else {
            Err(ConfigError::MissingKey {
                section: "Solver".to_string(),
                key: self.problem_type.as_str().to_string(),
            })
        }
    }
}
