//! Integration tests: validate whole documents from `tests/fixtures/`.
//!
//! `full_schema.json` uses every key the schema accepts, so it doubles as
//! the base document for the mutation tests below: each test perturbs one
//! spot of an otherwise valid document and checks the reported section.

use std::path::{Path, PathBuf};

use emsim_core::{ConfigError, ErrorKind, ProblemType, SymmetricTensor};
use emsim_schema::{load_config, parse_document, DocumentFormat, SimulationConfig};
use serde_json::{json, Value};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(fixtures_dir())
        .expect("fixtures directory")
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

fn full_document() -> Value {
    let path = fixtures_dir().join("full_schema.json");
    let text = std::fs::read_to_string(&path).expect("read full_schema.json");
    parse_document(&text, DocumentFormat::Json).expect("parse full_schema.json")
}

/// Visit every object node with the section path the validators give it.
fn object_paths(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            out.push(path.to_string());
            for (key, child) in map {
                let child_path = if path == "(root)" {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                object_paths(child, &child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                object_paths(item, &format!("{path}[{i}]"), out);
            }
        }
        _ => {}
    }
}

/// Mutable access to the object node at a section path produced by [`object_paths`].
fn node_at<'a>(root: &'a mut Value, path: &str) -> &'a mut Value {
    if path == "(root)" {
        return root;
    }
    let mut node = root;
    for part in path.split('.') {
        let (key, indices) = match part.find('[') {
            Some(i) => (&part[..i], &part[i..]),
            None => (part, ""),
        };
        node = &mut node[key];
        for index in indices.split(']').filter(|s| !s.is_empty()) {
            let i: usize = index.trim_start_matches('[').parse().expect("array index");
            node = &mut node[i];
        }
    }
    node
}

#[test]
fn test_all_fixtures_validate() {
    let files = fixture_files();
    assert!(files.len() >= 4, "expected fixtures in {}", fixtures_dir().display());
    for path in files {
        if let Err(e) = load_config(&path, None) {
            panic!("{} failed validation: {e}", path.display());
        }
    }
}

#[test]
fn test_full_schema_populates_every_section() {
    let config = load_config(&fixtures_dir().join("full_schema.json"), None).unwrap();
    assert_eq!(config.problem.problem_type, ProblemType::Eigenmode);
    assert_eq!(config.model.lc, Some(10.0));
    assert_eq!(config.model.refinement.boxes[0].bbmin, [1.0, 0.0, -1.0]);
    assert_eq!(config.model.refinement.boxes[0].bbmax, [5.0, 2.0, 1.0]);
    assert_eq!(config.domains.materials[0].attributes, vec![1, 7]);
    assert_eq!(config.boundaries.pec, vec![10, 11]);
    assert_eq!(config.boundaries.lumped_port.len(), 2);
    assert_eq!(config.boundaries.lumped_port.get(2).unwrap().nodes.len(), 2);
    assert_eq!(config.boundaries.surface_current.len(), 2);
    assert_eq!(config.boundaries.postprocessing.dielectric.len(), 2);
    assert_eq!(config.boundaries.attributes.len(), 15);
    assert!(config.solver.driven.is_some());
    assert!(config.solver.transient.is_some());
    assert_eq!(config.solver.eigenmode.as_ref().unwrap().feast_contour_np, 4);
    assert!(config.solver.linear.superlu_3d);
}

#[test]
fn test_yaml_fixture_alias_spellings() {
    let config = load_config(&fixtures_dir().join("capacitance_electrostatic.yaml"), None).unwrap();
    assert_eq!(config.boundaries.pec, vec![3]);
    assert_eq!(config.boundaries.lumped_port.len(), 2);
    assert!(config
        .boundaries
        .lumped_port
        .values()
        .all(|p| p.nodes.iter().all(|n| n.direction.is_none())));

    let coax = load_config(&fixtures_dir().join("coaxial_driven.yaml"), None).unwrap();
    assert_eq!(coax.boundaries.pec, vec![2, 3]);
    let port = coax.boundaries.lumped_port.get(1).unwrap();
    assert_eq!(port.nodes[0].direction.unwrap().to_string(), "+r");
}

#[test]
fn test_spurious_key_in_any_section_is_reported_there() {
    let base = full_document();
    let mut paths = Vec::new();
    object_paths(&base, "(root)", &mut paths);
    assert!(paths.len() > 30);

    for path in paths {
        let mut doc = base.clone();
        node_at(&mut doc, &path)["NotAnOption"] = json!(42);
        match SimulationConfig::from_value(&doc) {
            Err(ConfigError::UnknownKeys { section, keys, residual }) => {
                assert_eq!(section, path);
                assert_eq!(keys, vec!["NotAnOption".to_string()]);
                assert!(residual.contains("42"));
            }
            other => panic!("spurious key under {path}: expected UnknownKeys, got {other:?}"),
        }
    }
}

#[test]
fn test_duplicate_index_rejected_in_every_indexed_collection() {
    let collections = [
        "Domains.Postprocessing.Dielectric",
        "Domains.Postprocessing.Probe",
        "Boundaries.LumpedPort",
        "Boundaries.WavePort",
        "Boundaries.SurfaceCurrent",
        "Boundaries.Postprocessing.Capacitance",
        "Boundaries.Postprocessing.Inductance",
        "Boundaries.Postprocessing.Dielectric",
    ];
    let base = full_document();
    for collection in collections {
        let mut doc = base.clone();
        let entries = node_at(&mut doc, collection)
            .as_array_mut()
            .expect("indexed collection is an array");
        let duplicate = entries[0].clone();
        entries.push(duplicate);
        let err = SimulationConfig::from_value(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIndex, "{collection}: {err}");
        assert_eq!(err.section(), collection);
    }
}

#[test]
fn test_pec_and_ground_populate_the_same_entity() {
    let base = full_document();
    let mut ground = base.clone();
    let pec = ground["Boundaries"]
        .as_object_mut()
        .and_then(|b| b.remove("PEC"))
        .expect("PEC present");
    ground["Boundaries"]["Ground"] = pec.clone();

    let a = SimulationConfig::from_value(&base).unwrap();
    let b = SimulationConfig::from_value(&ground).unwrap();
    assert_eq!(a.boundaries, b.boundaries);

    let mut both = base.clone();
    both["Boundaries"]["Ground"] = pec;
    let err = SimulationConfig::from_value(&both).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.section(), "Boundaries");
}

#[test]
fn test_domain_dielectric_cross_reference() {
    let mut doc = full_document();
    doc["Domains"]["Postprocessing"]["Dielectric"][0]["Attributes"] = json!([2]);
    assert!(SimulationConfig::from_value(&doc).is_ok());

    doc["Domains"]["Postprocessing"]["Dielectric"][0]["Attributes"] = json!([99]);
    match SimulationConfig::from_value(&doc).unwrap_err() {
        ConfigError::CrossReference { attribute, .. } => assert_eq!(attribute, 99),
        other => panic!("Expected CrossReference, got: {other}"),
    }
}

#[test]
fn test_scalar_and_array_tensor_give_same_config() {
    let mut scalar = full_document();
    scalar["Domains"]["Materials"][1]["Permeability"] = json!(4.0);
    let mut array = full_document();
    array["Domains"]["Materials"][1]["Permeability"] = json!([4.0, 4.0, 4.0]);

    let a = SimulationConfig::from_value(&scalar).unwrap();
    let b = SimulationConfig::from_value(&array).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.domains.materials[1].mu_r, SymmetricTensor::isotropic(4.0));
}

#[test]
fn test_direction_normalization_in_document() {
    let mut doc = full_document();
    doc["Boundaries"]["LumpedPort"][0]["Direction"] = json!("x");
    let config = SimulationConfig::from_value(&doc).unwrap();
    let port = config.boundaries.lumped_port.get(1).unwrap();
    assert_eq!(port.nodes[0].direction.unwrap().to_string(), "+x");

    doc["Boundaries"]["LumpedPort"][0]["Direction"] = json!("-Y");
    let config = SimulationConfig::from_value(&doc).unwrap();
    let port = config.boundaries.lumped_port.get(1).unwrap();
    assert_eq!(port.nodes[0].direction.unwrap().to_string(), "-y");

    doc["Boundaries"]["LumpedPort"][0]["Direction"] = json!("q");
    let err = SimulationConfig::from_value(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert_eq!(err.section(), "Boundaries.LumpedPort[0]");
}

#[test]
fn test_validated_config_serializes() {
    let config = load_config(&fixtures_dir().join("full_schema.json"), None).unwrap();
    let dumped = serde_json::to_value(&config).unwrap();
    assert_eq!(dumped["problem"]["type"], "Eigenmode");
    assert_eq!(dumped["boundaries"]["lumped_port"]["2"]["nodes"][0]["direction"], "+r");
    assert_eq!(dumped["solver"]["linear"]["ksp_type"], "GMRES");
}

#[test]
fn test_format_override() {
    let path: &Path = &fixtures_dir().join("coaxial_driven.yaml");
    let err = load_config(path, Some(DocumentFormat::Json)).unwrap_err();
    assert!(matches!(err, emsim_schema::LoadError::Parse { .. }));
}
