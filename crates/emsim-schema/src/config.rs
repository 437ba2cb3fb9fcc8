//! # Simulation Configuration: Aggregator
//!
//! [`SimulationConfig::from_value`] is a pure function from a parsed
//! document tree to the validated configuration. Sections are validated
//! in a fixed order (Problem, Model, Domains, Boundaries, Solver); the
//! top-level allowlist is checked next, and the problem-type/solver check
//! runs last because it needs two completed sections.

use emsim_core::{ConfigError, Section};
use serde::Serialize;
use serde_json::Value;

use crate::boundaries::BoundaryData;
use crate::domains::DomainData;
use crate::model::ModelData;
use crate::problem::ProblemData;
use crate::solver::SolverData;

/// Keys accepted at the top level of a document.
pub const TOP_LEVEL_KEYS: &[&str] = &["Problem", "Model", "Domains", "Boundaries", "Solver"];

/// A fully validated simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub problem: ProblemData,
    pub model: ModelData,
    pub domains: DomainData,
    pub boundaries: BoundaryData,
    pub solver: SolverData,
}

impl SimulationConfig {
    /// Validate a parsed document.
    ///
    /// The tree is only borrowed; validating it twice gives the same
    /// result.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] encountered. No partial configuration is
    /// returned.
    pub fn from_value(document: &Value) -> Result<Self, ConfigError> {
        let root = Section::root(document, TOP_LEVEL_KEYS)?;
        let problem = ProblemData::parse(&root)?;
        let model = ModelData::parse(&root)?;
        let domains = DomainData::parse(&root)?;
        let boundaries = BoundaryData::parse(&root)?;
        let solver = SolverData::parse(&root)?;
        root.finish()?;
        problem.check_solver(&solver)?;

        tracing::info!(
            problem_type = %problem.problem_type,
            mesh = %model.mesh,
            materials = domains.materials.len(),
            domain_attributes = domains.attributes.len(),
            boundary_attributes = boundaries.attributes.len(),
            order = solver.order,
            "configuration validated"
        );
        Ok(Self {
            problem,
            model,
            domains,
            boundaries,
            solver,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "Problem": {"Type": "Driven", "Output": "out"},
            "Model": {"Mesh": "mesh/coax.msh", "Refinement": {"Spheres": [{"Levels": 1, "Radius": 0.5, "Center": [0, 0, 0]}]}},
            "Domains": {
                "Materials": [{"Attributes": [1], "Permittivity": 2.1}],
                "Postprocessing": {"Probe": [{"Index": 1, "X": 0.0, "Y": 0.0, "Z": 1.0}]}
            },
            "Boundaries": {
                "PEC": {"Attributes": [2]},
                "LumpedPort": [{"Index": 1, "R": 50.0, "Elements": [{"Attributes": [3], "Direction": "+r"}]}],
                "Postprocessing": {"Dielectric": [{"Index": 1, "Thickness": 1e-3, "Permittivity": 4.0, "Attributes": [2], "Side": ""}]}
            },
            "Solver": {"Driven": {"MinFreq": 1.0, "MaxFreq": 5.0, "FreqStep": 1.0}, "Linear": {"Tol": 1e-8}}
        })
    }

    /// Object sections of [`document`] and the pointer reaching each one.
    const SECTIONS: &[(&str, &str)] = &[
        ("(root)", ""),
        ("Problem", "/Problem"),
        ("Model", "/Model"),
        ("Model.Refinement", "/Model/Refinement"),
        ("Model.Refinement.Spheres[0]", "/Model/Refinement/Spheres/0"),
        ("Domains", "/Domains"),
        ("Domains.Materials[0]", "/Domains/Materials/0"),
        ("Domains.Postprocessing", "/Domains/Postprocessing"),
        ("Domains.Postprocessing.Probe[0]", "/Domains/Postprocessing/Probe/0"),
        ("Boundaries", "/Boundaries"),
        ("Boundaries.PEC", "/Boundaries/PEC"),
        ("Boundaries.LumpedPort[0]", "/Boundaries/LumpedPort/0"),
        ("Boundaries.LumpedPort[0].Elements[0]", "/Boundaries/LumpedPort/0/Elements/0"),
        ("Boundaries.Postprocessing", "/Boundaries/Postprocessing"),
        ("Boundaries.Postprocessing.Dielectric[0]", "/Boundaries/Postprocessing/Dielectric/0"),
        ("Solver", "/Solver"),
        ("Solver.Driven", "/Solver/Driven"),
        ("Solver.Linear", "/Solver/Linear"),
    ];

    proptest! {
        /// A key no section accepts is reported at exactly the section holding it.
        #[test]
        fn spurious_key_reported_at_its_section(
            section in 0..SECTIONS.len(),
            key in "X_[A-Za-z0-9]{1,10}",
        ) {
            let (path, pointer) = SECTIONS[section];
            let mut doc = document();
            prop_assert!(SimulationConfig::from_value(&doc).is_ok());
            let object = doc.pointer_mut(pointer).and_then(Value::as_object_mut);
            prop_assert!(object.is_some(), "no object at {}", pointer);
            if let Some(object) = object {
                object.insert(key.clone(), json!(0));
            }
            match SimulationConfig::from_value(&doc) {
                Err(ConfigError::UnknownKeys { section, keys, .. }) => {
                    prop_assert_eq!(section, path);
                    prop_assert_eq!(keys, vec![key]);
                }
                other => prop_assert!(false, "expected UnknownKeys at {}, got {:?}", path, other),
            }
        }
    }
}
