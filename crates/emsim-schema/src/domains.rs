//! # Domains Section
//!
//! Volume materials and domain postprocessing. Materials form an ordered
//! list; postprocessing entries are keyed by a user-declared index.
//!
//! ## Cross-Reference
//!
//! Every attribute named by a `Postprocessing.Dielectric` entry must belong
//! to some material. The check runs once both subsections are complete.

use emsim_core::{AttributeSet, ConfigError, IndexedMap, Section, SymmetricTensor};
use serde::Serialize;

pub(crate) const DOMAINS_KEYS: &[&str] = &["Materials", "Postprocessing"];
const MATERIAL_KEYS: &[&str] = &[
    "Attributes",
    "Permeability",
    "Permittivity",
    "LossTan",
    "Conductivity",
    "MaterialAxes",
    "LondonDepth",
];
const POSTPROCESSING_KEYS: &[&str] = &["Dielectric", "Probe"];
const DIELECTRIC_KEYS: &[&str] = &["Index", "Attributes"];
const PROBE_KEYS: &[&str] = &["Index", "X", "Y", "Z"];

/// Validated `Domains` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainData {
    /// Materials, in document order.
    pub materials: Vec<MaterialData>,
    /// Domain postprocessing.
    pub postprocessing: DomainPostData,
    /// Union of all material attributes.
    pub attributes: AttributeSet,
}

/// One material region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialData {
    /// Domain attributes, ascending.
    pub attributes: Vec<i32>,
    /// Relative permeability.
    pub mu_r: SymmetricTensor<3>,
    /// Relative permittivity.
    pub epsilon_r: SymmetricTensor<3>,
    /// Loss tangent.
    pub tandelta: SymmetricTensor<3>,
    /// Electrical conductivity, S/m.
    pub sigma: SymmetricTensor<3>,
    /// London penetration depth for superconductors, in mesh units.
    pub lambda_l: f64,
}

/// `Domains.Postprocessing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DomainPostData {
    /// Bulk dielectric loss integrals, by index.
    pub dielectric: IndexedMap<DomainDielectricData>,
    /// Field probes, by index.
    pub probe: IndexedMap<ProbeData>,
    /// Union of dielectric postprocessing attributes.
    pub attributes: AttributeSet,
}

/// Bulk dielectric loss postprocessing over a set of domains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainDielectricData {
    pub attributes: Vec<i32>,
}

/// Point probe location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl DomainData {
    pub(crate) fn parse(root: &Section<'_>) -> Result<Self, ConfigError> {
        let domains = root.required_subsection("Domains", DOMAINS_KEYS)?;

        let mut materials = Vec::new();
        let mut attributes = AttributeSet::new();
        for entry in domains.required_entries("Materials", MATERIAL_KEYS)? {
            let material = MaterialData::parse(&entry)?;
            attributes.extend_from(&material.attributes);
            materials.push(material);
        }

        let postprocessing = match domains.subsection("Postprocessing", POSTPROCESSING_KEYS)? {
            Some(section) => DomainPostData::parse(&section)?,
            None => DomainPostData::default(),
        };
        domains.finish()?;

        let data = Self {
            materials,
            postprocessing,
            attributes,
        };
        data.check_references(&domains)?;
        tracing::debug!(
            materials = data.materials.len(),
            attributes = ?data.attributes,
            dielectric = data.postprocessing.dielectric.len(),
            probes = data.postprocessing.probe.len(),
            "parsed Domains"
        );
        Ok(data)
    }

    fn check_references(&self, domains: &Section<'_>) -> Result<(), ConfigError> {
        for (index, entry) in &self.postprocessing.dielectric {
            let referenced: AttributeSet = entry.attributes.iter().copied().collect();
            if let Some(attribute) = referenced.difference(&self.attributes).next() {
                return Err(ConfigError::CrossReference {
                    section: format!("{}.Postprocessing.Dielectric", domains.path()),
                    attribute,
                    reason: format!("by entry {index} is not declared by any material"),
                });
            };
        }
        Ok(())
    }
}

impl MaterialData {
    fn parse(entry: &Section<'_>) -> Result<Self, ConfigError> {
        let mut attributes: Vec<i32> = entry.required("Attributes")?;
        attributes.sort_unstable();
        let material = Self {
            attributes,
            mu_r: entry.tensor("Permeability", "MaterialAxes", SymmetricTensor::isotropic(1.0))?,
            epsilon_r: entry.tensor("Permittivity", "MaterialAxes", SymmetricTensor::isotropic(1.0))?,
            tandelta: entry.tensor("LossTan", "MaterialAxes", SymmetricTensor::isotropic(0.0))?,
            sigma: entry.tensor("Conductivity", "MaterialAxes", SymmetricTensor::isotropic(0.0))?,
            lambda_l: entry.optional("LondonDepth", 0.0)?,
        };
        entry.finish()?;
        Ok(material)
    }
}

impl DomainPostData {
    fn parse(section: &Section<'_>) -> Result<Self, ConfigError> {
        let mut data = Self::default();

        if let Some(entries) = section.entries("Dielectric", DIELECTRIC_KEYS)? {
            let collection = section.child_path("Dielectric");
            for entry in entries {
                let index = entry.required_positive("Index")?;
                let mut attributes: Vec<i32> = entry.required("Attributes")?;
                attributes.sort_unstable();
                entry.finish()?;
                data.attributes.extend_from(&attributes);
                data.dielectric
                    .try_insert(&collection, index, DomainDielectricData { attributes })?;
            }
        }

        if let Some(entries) = section.entries("Probe", PROBE_KEYS)? {
            let collection = section.child_path("Probe");
            for entry in entries {
                let index = entry.required_positive("Index")?;
                let probe = ProbeData {
                    x: entry.required("X")?,
                    y: entry.required("Y")?,
                    z: entry.required("Z")?,
                };
                entry.finish()?;
                data.probe.try_insert(&collection, index, probe)?;
            }
        }

        section.finish()?;
        Ok(data)
    }
}
