//! # Boundaries Section
//!
//! Boundary conditions, port excitations, surface current sources and
//! boundary postprocessing.
//!
//! Three entities accept two spellings: `PEC`/`Ground`, `PMC`/`ZeroCharge`
//! and `LumpedPort`/`Terminal`. Either spelling populates the same field
//! of [`BoundaryData`]; writing both is a conflict. For ports the spelling
//! matters: `Terminal` entries carry no validated direction.
//!
//! Postprocessing is read last, after every boundary kind is complete, and
//! [`BoundaryData::attributes`] collects every boundary attribute named
//! anywhere in the section.

mod ports;
mod postprocessing;

pub use ports::{LumpedPortData, SurfaceCurrentData, WavePortData};
pub use postprocessing::{
    BoundaryPostData, CapacitanceData, InductanceData, InterfaceDielectricData, InterfaceKind,
};

use emsim_core::{AliasPair, AttributeSet, ConfigError, IndexedMap, Section};
use serde::Serialize;

use crate::nodes::boundary_attributes;

pub(crate) const BOUNDARIES_KEYS: &[&str] = &[
    "PEC",
    "Ground",
    "PMC",
    "ZeroCharge",
    "WavePortPEC",
    "Absorbing",
    "Conductivity",
    "Impedance",
    "LumpedPort",
    "Terminal",
    "WavePort",
    "SurfaceCurrent",
    "Postprocessing",
];

const PEC: AliasPair = AliasPair {
    canonical: "PEC",
    alias: "Ground",
};
const PMC: AliasPair = AliasPair {
    canonical: "PMC",
    alias: "ZeroCharge",
};
pub(crate) const PORT: AliasPair = AliasPair {
    canonical: "LumpedPort",
    alias: "Terminal",
};

const ATTRIBUTE_KEYS: &[&str] = &["Attributes"];
const ABSORBING_KEYS: &[&str] = &["Attributes", "Order"];
const CONDUCTIVITY_KEYS: &[&str] = &["Attributes", "Conductivity", "Permeability", "Thickness", "External"];
const IMPEDANCE_KEYS: &[&str] = &["Attributes", "Rs", "Ls", "Cs"];

/// Validated `Boundaries` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundaryData {
    /// Perfect electric conductor (`PEC` or `Ground`).
    pub pec: Vec<i32>,
    /// Perfect magnetic conductor (`PMC` or `ZeroCharge`).
    pub pmc: Vec<i32>,
    /// Boundaries treated as PEC only when solving wave port modes.
    pub wave_port_pec: Vec<i32>,
    /// First- or second-order absorbing boundary.
    pub absorbing: Option<AbsorbingData>,
    /// Finite conductivity surfaces, in document order.
    pub conductivity: Vec<ConductivityData>,
    /// Surface impedance boundaries, in document order.
    pub impedance: Vec<ImpedanceData>,
    /// Lumped ports or terminals, by index.
    pub lumped_port: IndexedMap<LumpedPortData>,
    /// Numeric wave ports, by index.
    pub wave_port: IndexedMap<WavePortData>,
    /// Surface current sources, by index.
    pub surface_current: IndexedMap<SurfaceCurrentData>,
    /// Boundary postprocessing.
    pub postprocessing: BoundaryPostData,
    /// Union of every boundary attribute in the section.
    pub attributes: AttributeSet,
}

/// `Boundaries.Absorbing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsorbingData {
    pub attributes: Vec<i32>,
    /// 1 or 2.
    pub order: u8,
}

/// One `Boundaries.Conductivity` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConductivityData {
    pub attributes: Vec<i32>,
    /// Electrical conductivity, S/m.
    pub sigma: f64,
    /// Relative permeability of the conductor.
    pub mu_r: f64,
    /// Conductor thickness; zero means infinitely thick.
    pub h: f64,
    /// Whether the surface is external to the computational domain.
    pub external: bool,
}

/// One `Boundaries.Impedance` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpedanceData {
    pub attributes: Vec<i32>,
    pub rs: f64,
    pub ls: f64,
    pub cs: f64,
}

impl BoundaryData {
    pub(crate) fn parse(root: &Section<'_>) -> Result<Self, ConfigError> {
        let boundaries = root.required_subsection("Boundaries", BOUNDARIES_KEYS)?;
        let mut data = Self::default();

        if let Some(found) = boundaries.alias(PEC)? {
            let section = Section::new(boundaries.child_path(found.key), found.value, ATTRIBUTE_KEYS)?;
            data.pec = attribute_list(&section)?;
        }
        if let Some(found) = boundaries.alias(PMC)? {
            let section = Section::new(boundaries.child_path(found.key), found.value, ATTRIBUTE_KEYS)?;
            data.pmc = attribute_list(&section)?;
        }
        if let Some(section) = boundaries.subsection("WavePortPEC", ATTRIBUTE_KEYS)? {
            data.wave_port_pec = attribute_list(&section)?;
        }
        if let Some(section) = boundaries.subsection("Absorbing", ABSORBING_KEYS)? {
            data.absorbing = Some(AbsorbingData::parse(&section)?);
        }
        for entry in boundaries.entries("Conductivity", CONDUCTIVITY_KEYS)?.unwrap_or_default() {
            data.conductivity.push(ConductivityData::parse(&entry)?);
        }
        for entry in boundaries.entries("Impedance", IMPEDANCE_KEYS)?.unwrap_or_default() {
            data.impedance.push(ImpedanceData::parse(&entry)?);
        }

        data.lumped_port = ports::parse_lumped_ports(&boundaries)?;
        data.wave_port = ports::parse_wave_ports(&boundaries)?;
        data.surface_current = ports::parse_surface_currents(&boundaries)?;

        if let Some(section) = boundaries.subsection("Postprocessing", postprocessing::POSTPROCESSING_KEYS)? {
            data.postprocessing = BoundaryPostData::parse(&section)?;
        }
        boundaries.finish()?;

        data.collect_attributes();
        tracing::debug!(
            pec = ?data.pec,
            pmc = ?data.pmc,
            lumped_ports = data.lumped_port.len(),
            wave_ports = data.wave_port.len(),
            surface_currents = data.surface_current.len(),
            attributes = data.attributes.len(),
            "parsed Boundaries"
        );
        Ok(data)
    }

    fn collect_attributes(&mut self) {
        let mut all = AttributeSet::new();
        all.extend_from(&self.pec);
        all.extend_from(&self.pmc);
        all.extend_from(&self.wave_port_pec);
        if let Some(absorbing) = &self.absorbing {
            all.extend_from(&absorbing.attributes);
        }
        for c in &self.conductivity {
            all.extend_from(&c.attributes);
        }
        for z in &self.impedance {
            all.extend_from(&z.attributes);
        }
        for port in self.lumped_port.values() {
            for node in &port.nodes {
                all.extend_from(&node.attributes);
            }
        }
        for port in self.wave_port.values() {
            all.extend_from(&port.attributes);
        }
        for source in self.surface_current.values() {
            for node in &source.nodes {
                all.extend_from(&node.attributes);
            }
        }
        all.union_with(&self.postprocessing.attributes);
        self.attributes = all;
    }
}

fn attribute_list(section: &Section<'_>) -> Result<Vec<i32>, ConfigError> {
    let attributes = boundary_attributes(section)?;
    section.finish()?;
    Ok(attributes)
}

impl AbsorbingData {
    fn parse(section: &Section<'_>) -> Result<Self, ConfigError> {
        let attributes = boundary_attributes(section)?;
        let order: i64 = section.optional("Order", 1)?;
        let order = match order {
            1 => 1,
            2 => 2,
            other => {
                return Err(section.malformed(
                    "Order",
                    format!("only first- and second-order absorbing boundaries are supported, found {other}"),
                ))
            }
        };
        section.finish()?;
        Ok(Self { attributes, order })
    }
}

impl ConductivityData {
    fn parse(entry: &Section<'_>) -> Result<Self, ConfigError> {
        let data = Self {
            attributes: boundary_attributes(entry)?,
            sigma: entry.required("Conductivity")?,
            mu_r: entry.optional("Permeability", 1.0)?,
            h: entry.optional("Thickness", 0.0)?,
            external: entry.optional("External", false)?,
        };
        entry.finish()?;
        Ok(data)
    }
}

impl ImpedanceData {
    fn parse(entry: &Section<'_>) -> Result<Self, ConfigError> {
        let data = Self {
            attributes: boundary_attributes(entry)?,
            rs: entry.optional("Rs", 0.0)?,
            ls: entry.optional("Ls", 0.0)?,
            cs: entry.optional("Cs", 0.0)?,
        };
        entry.finish()?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emsim_core::ErrorKind;
    use serde_json::{json, Value};

    const ROOT_KEYS: &[&str] = &["Boundaries"];

    fn parse(boundaries: Value) -> Result<BoundaryData, ConfigError> {
        let doc = json!({ "Boundaries": boundaries });
        let root = Section::root(&doc, ROOT_KEYS)?;
        BoundaryData::parse(&root)
    }

    #[test]
    fn test_pec_alias_spellings_agree() {
        let a = parse(json!({"PEC": {"Attributes": [3, 1]}})).unwrap();
        let b = parse(json!({"Ground": {"Attributes": [1, 3]}})).unwrap();
        assert_eq!(a.pec, vec![1, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pec_alias_conflict() {
        let err = parse(json!({"PEC": {"Attributes": [1]}, "Ground": {"Attributes": [2]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.section(), "Boundaries");
    }

    #[test]
    fn test_pmc_alias_spellings_agree() {
        let a = parse(json!({"PMC": {"Attributes": [4]}})).unwrap();
        let b = parse(json!({"ZeroCharge": {"Attributes": [4]}})).unwrap();
        assert_eq!(a.pmc, vec![4]);
        assert_eq!(a, b);
        let err = parse(json!({"PMC": {"Attributes": [4]}, "ZeroCharge": {"Attributes": [4]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_alias_residual_reported_under_spelling_used() {
        let err = parse(json!({"Ground": {"Attributes": [1], "Attribute": [2]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKeys);
        assert_eq!(err.section(), "Boundaries.Ground");
    }

    #[test]
    fn test_absorbing_order() {
        let b = parse(json!({"Absorbing": {"Attributes": [5]}})).unwrap();
        assert_eq!(b.absorbing.unwrap().order, 1);
        let b = parse(json!({"Absorbing": {"Attributes": [5], "Order": 2}})).unwrap();
        assert_eq!(b.absorbing.unwrap().order, 2);
        let err = parse(json!({"Absorbing": {"Attributes": [5], "Order": 3}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(err.section(), "Boundaries.Absorbing");
    }

    #[test]
    fn test_conductivity_list() {
        let b = parse(json!({"Conductivity": [
            {"Attributes": [2], "Conductivity": 5.8e7},
            {"Attributes": [3], "Conductivity": 1e6, "Thickness": 1e-6, "External": true}
        ]}))
        .unwrap();
        assert_eq!(b.conductivity.len(), 2);
        assert_eq!(b.conductivity[0].mu_r, 1.0);
        assert_eq!(b.conductivity[0].h, 0.0);
        assert!(b.conductivity[1].external);
    }

    #[test]
    fn test_conductivity_requires_value() {
        let err = parse(json!({"Conductivity": [{"Attributes": [2]}]})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingKey {
                section: "Boundaries.Conductivity[0]".into(),
                key: "Conductivity".into()
            }
        );
    }

    #[test]
    fn test_impedance_defaults() {
        let b = parse(json!({"Impedance": [{"Attributes": [9], "Ls": 1e-9}]})).unwrap();
        let z = &b.impedance[0];
        assert_eq!((z.rs, z.ls, z.cs), (0.0, 1e-9, 0.0));
    }

    #[test]
    fn test_attribute_union() {
        let b = parse(json!({
            "PEC": {"Attributes": [1]},
            "Absorbing": {"Attributes": [2]},
            "LumpedPort": [{"Index": 1, "Attributes": [3], "Direction": "x"}],
            "WavePort": [{"Index": 1, "Attributes": [4]}],
            "SurfaceCurrent": [{"Index": 1, "Elements": [{"Attributes": [5], "Direction": "y"}]}],
            "Postprocessing": {"Capacitance": [{"Index": 1, "Attributes": [6]}]}
        }))
        .unwrap();
        assert_eq!(b.attributes.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_boundaries() {
        let b = parse(json!({})).unwrap();
        assert!(b.attributes.is_empty());
        assert!(b.absorbing.is_none());
    }

    #[test]
    fn test_unknown_boundary_kind() {
        let err = parse(json!({"Periodic": {"Attributes": [1]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKeys);
        assert_eq!(err.section(), "Boundaries");
    }
}
