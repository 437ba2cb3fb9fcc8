//! # Model Section
//!
//! Geometry source and mesh refinement. `Model.Refinement` may request
//! uniform refinement levels plus local refinement inside axis-aligned
//! boxes and spheres.

use emsim_core::{ConfigError, Section};
use serde::Serialize;

pub(crate) const MODEL_KEYS: &[&str] = &["Mesh", "L0", "Lc", "Partition", "ReorientTetMesh", "Refinement"];
const REFINEMENT_KEYS: &[&str] = &["UniformLevels", "Boxes", "Spheres"];
const BOX_KEYS: &[&str] = &["Levels", "XLimits", "YLimits", "ZLimits"];
const SPHERE_KEYS: &[&str] = &["Levels", "Radius", "Center"];

/// Mesh and geometry parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelData {
    /// Path of the mesh file.
    pub mesh: String,
    /// Unit of length of the mesh coordinates, in meters.
    pub l0: f64,
    /// Characteristic length for nondimensionalization, in mesh units.
    /// `None` lets the mesh loader derive it from the bounding box.
    pub lc: Option<f64>,
    /// Optional partition file for distributed runs.
    pub partition: String,
    /// Reorient tetrahedral elements on load.
    pub reorient_tet_mesh: bool,
    /// Mesh refinement.
    pub refinement: RefinementData,
}

/// Uniform and region-based refinement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefinementData {
    /// Number of uniform refinement levels.
    pub uniform_levels: u32,
    /// Box refinement regions, in document order.
    pub boxes: Vec<BoxRefinement>,
    /// Sphere refinement regions, in document order.
    pub spheres: Vec<SphereRefinement>,
}

/// Refinement inside an axis-aligned box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxRefinement {
    /// Levels of refinement.
    pub levels: u32,
    /// Lower corner.
    pub bbmin: [f64; 3],
    /// Upper corner.
    pub bbmax: [f64; 3],
}

/// Refinement inside a sphere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereRefinement {
    /// Levels of refinement.
    pub levels: u32,
    /// Radius.
    pub radius: f64,
    /// Center point.
    pub center: [f64; 3],
}

impl ModelData {
    pub(crate) fn parse(root: &Section<'_>) -> Result<Self, ConfigError> {
        let model = root.required_subsection("Model", MODEL_KEYS)?;
        let data = Self {
            mesh: model.required("Mesh")?,
            l0: model.optional("L0", 1.0e-6)?,
            lc: model.optional_opt("Lc")?,
            partition: model.optional("Partition", String::new())?,
            reorient_tet_mesh: model.optional("ReorientTetMesh", false)?,
            refinement: RefinementData::parse(&model)?,
        };
        model.finish()?;
        tracing::debug!(
            mesh = %data.mesh,
            l0 = data.l0,
            lc = ?data.lc,
            partition = %data.partition,
            reorient_tet_mesh = data.reorient_tet_mesh,
            "parsed Model"
        );
        Ok(data)
    }
}

impl RefinementData {
    fn parse(model: &Section<'_>) -> Result<Self, ConfigError> {
        let Some(refinement) = model.subsection("Refinement", REFINEMENT_KEYS)? else {
            return Ok(Self::default());
        };
        let uniform_levels = levels(&refinement, "UniformLevels", Some(0))?;

        let mut boxes = Vec::new();
        for entry in refinement.entries("Boxes", BOX_KEYS)?.unwrap_or_default() {
            let levels = levels(&entry, "Levels", None)?;
            let [xmin, xmax] = entry.limits("XLimits")?;
            let [ymin, ymax] = entry.limits("YLimits")?;
            let [zmin, zmax] = entry.limits("ZLimits")?;
            entry.finish()?;
            boxes.push(BoxRefinement {
                levels,
                bbmin: [xmin, ymin, zmin],
                bbmax: [xmax, ymax, zmax],
            });
        }

        let mut spheres = Vec::new();
        for entry in refinement.entries("Spheres", SPHERE_KEYS)?.unwrap_or_default() {
            let levels = levels(&entry, "Levels", None)?;
            let radius: f64 = entry.required("Radius")?;
            if radius <= 0.0 {
                return Err(entry.malformed("Radius", format!("must be positive, found {radius}")));
            }
            let center = entry.point::<3>("Center")?;
            entry.finish()?;
            spheres.push(SphereRefinement {
                levels,
                radius,
                center,
            });
        }

        refinement.finish()?;
        tracing::debug!(
            uniform_levels,
            boxes = boxes.len(),
            spheres = spheres.len(),
            "parsed Model.Refinement"
        );
        Ok(Self {
            uniform_levels,
            boxes,
            spheres,
        })
    }
}

/// Read a non-negative level count; required when `default` is `None`.
fn levels(section: &Section<'_>, key: &str, default: Option<u32>) -> Result<u32, ConfigError> {
    let n: i64 = match default {
        Some(d) => section.optional(key, i64::from(d))?,
        None => section.required(key)?,
    };
    u32::try_from(n)
        .map_err(|_| section.malformed(key, format!("number of refinement levels must be non-negative, found {n}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use emsim_core::ErrorKind;
    use serde_json::{json, Value};

    const ROOT_KEYS: &[&str] = &["Model"];

    fn parse(model: Value) -> Result<ModelData, ConfigError> {
        let doc = json!({ "Model": model });
        let root = Section::root(&doc, ROOT_KEYS)?;
        ModelData::parse(&root)
    }

    #[test]
    fn test_minimal_model() {
        let m = parse(json!({"Mesh": "mesh/cavity.msh"})).unwrap();
        assert_eq!(m.mesh, "mesh/cavity.msh");
        assert_eq!(m.l0, 1.0e-6);
        assert_eq!(m.lc, None);
        assert!(!m.reorient_tet_mesh);
        assert_eq!(m.refinement, RefinementData::default());
    }

    #[test]
    fn test_missing_mesh() {
        let err = parse(json!({"L0": 1e-3})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingKey {
                section: "Model".into(),
                key: "Mesh".into()
            }
        );
    }

    #[test]
    fn test_box_limits_are_ordered() {
        let m = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {
                "UniformLevels": 2,
                "Boxes": [{"Levels": 1, "XLimits": [5, 1], "YLimits": [0, 2], "ZLimits": [3.5, -1]}]
            }
        }))
        .unwrap();
        assert_eq!(m.refinement.uniform_levels, 2);
        let b = &m.refinement.boxes[0];
        assert_eq!(b.bbmin, [1.0, 0.0, -1.0]);
        assert_eq!(b.bbmax, [5.0, 2.0, 3.5]);
    }

    #[test]
    fn test_box_limits_wrong_length() {
        let err = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {"Boxes": [{"Levels": 1, "XLimits": [0, 1, 2], "YLimits": [0, 1], "ZLimits": [0, 1]}]}
        }))
        .unwrap_err();
        match err {
            ConfigError::Malformed { section, field, .. } => {
                assert_eq!(section, "Model.Refinement.Boxes[0]");
                assert_eq!(field, "XLimits");
            }
            other => panic!("Expected Malformed, got: {other}"),
        }
    }

    #[test]
    fn test_box_missing_limits() {
        let err = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {"Boxes": [{"Levels": 1, "XLimits": [0, 1], "YLimits": [0, 1]}]}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
    }

    #[test]
    fn test_sphere_refinement() {
        let m = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {"Spheres": [{"Levels": 3, "Radius": 0.5, "Center": [0, 0, 1]}]}
        }))
        .unwrap();
        let s = &m.refinement.spheres[0];
        assert_eq!(s.levels, 3);
        assert_eq!(s.center, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sphere_center_wrong_length() {
        let err = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {"Spheres": [{"Levels": 3, "Radius": 0.5, "Center": [0, 0]}]}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_negative_uniform_levels() {
        let err = parse(json!({"Mesh": "m.msh", "Refinement": {"UniformLevels": -1}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(err.section(), "Model.Refinement");
    }

    #[test]
    fn test_boxes_must_be_array() {
        let err = parse(json!({"Mesh": "m.msh", "Refinement": {"Boxes": {"Levels": 1}}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_unknown_key_in_box() {
        let err = parse(json!({
            "Mesh": "m.msh",
            "Refinement": {"Boxes": [{"Levels": 1, "XLimits": [0, 1], "YLimits": [0, 1], "ZLimits": [0, 1], "WLimits": [0, 1]}]}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKeys);
        assert_eq!(err.section(), "Model.Refinement.Boxes[0]");
    }

    #[test]
    fn test_unknown_key_in_model() {
        let err = parse(json!({"Mesh": "m.msh", "Mesh2": "x"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKeys);
        assert_eq!(err.section(), "Model");
    }
}
