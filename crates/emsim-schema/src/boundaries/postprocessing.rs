//! `Boundaries.Postprocessing`: surface capacitance, inductance and
//! interface dielectric loss.

use emsim_core::{AttributeSet, ConfigError, Direction, IndexedMap, Section};
use serde::Serialize;

use crate::nodes::{boundary_attributes, read_nodes, Node, TagRule, SIDE_ELEMENT_KEYS};

pub(super) const POSTPROCESSING_KEYS: &[&str] = &["Capacitance", "Inductance", "Dielectric"];
const CAPACITANCE_KEYS: &[&str] = &["Index", "Attributes"];
const INDUCTANCE_KEYS: &[&str] = &["Index", "Attributes", "Direction"];
const DIELECTRIC_KEYS: &[&str] = &[
    "Index",
    "Thickness",
    "LossTan",
    "Permittivity",
    "PermittivityMA",
    "PermittivityMS",
    "PermittivitySA",
    "Attributes",
    "Side",
    "Elements",
];

const INTERFACE_SIDE: TagRule = TagRule {
    key: "Side",
    element_keys: SIDE_ELEMENT_KEYS,
    required: false,
    allow_radial: false,
    ignored: false,
    empty_is_unset: true,
};

/// Validated boundary postprocessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundaryPostData {
    pub capacitance: IndexedMap<CapacitanceData>,
    pub inductance: IndexedMap<InductanceData>,
    pub dielectric: IndexedMap<InterfaceDielectricData>,
    /// Union of all postprocessing attributes.
    pub attributes: AttributeSet,
}

/// Surface charge integral over a set of boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitanceData {
    pub attributes: Vec<i32>,
}

/// Magnetic flux integral through a set of boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InductanceData {
    pub attributes: Vec<i32>,
    /// Flux direction.
    pub direction: Direction,
}

/// Which interface a thin dielectric layer models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterfaceKind {
    /// Generic layer (`Permittivity`).
    #[serde(rename = "Permittivity")]
    General,
    /// Metal-air interface (`PermittivityMA`).
    #[serde(rename = "PermittivityMA")]
    MetalAir,
    /// Metal-substrate interface (`PermittivityMS`).
    #[serde(rename = "PermittivityMS")]
    MetalSubstrate,
    /// Substrate-air interface (`PermittivitySA`).
    #[serde(rename = "PermittivitySA")]
    SubstrateAir,
}

impl InterfaceKind {
    /// Every kind together with the key that selects it.
    pub const KEYS: [(InterfaceKind, &'static str); 4] = [
        (Self::General, "Permittivity"),
        (Self::MetalAir, "PermittivityMA"),
        (Self::MetalSubstrate, "PermittivityMS"),
        (Self::SubstrateAir, "PermittivitySA"),
    ];
}

/// Interface dielectric loss of a thin layer on a set of boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceDielectricData {
    /// Layer thickness.
    pub ts: f64,
    /// Loss tangent of the layer.
    pub tandelta: f64,
    /// Interface model and its relative permittivity.
    pub kind: InterfaceKind,
    pub epsilon_r: f64,
    /// Element groups, with an optional side each.
    pub nodes: Vec<Node>,
}

impl BoundaryPostData {
    pub(super) fn parse(section: &Section<'_>) -> Result<Self, ConfigError> {
        let mut data = Self::default();

        if let Some(entries) = section.entries("Capacitance", CAPACITANCE_KEYS)? {
            let collection = section.child_path("Capacitance");
            for entry in entries {
                let index = entry.required_positive("Index")?;
                let attributes = boundary_attributes(&entry)?;
                entry.finish()?;
                data.attributes.extend_from(&attributes);
                data.capacitance
                    .try_insert(&collection, index, CapacitanceData { attributes })?;
            }
        }

        if let Some(entries) = section.entries("Inductance", INDUCTANCE_KEYS)? {
            let collection = section.child_path("Inductance");
            for entry in entries {
                let index = entry.required_positive("Index")?;
                let attributes = boundary_attributes(&entry)?;
                let direction = entry.required_direction("Direction", false)?;
                entry.finish()?;
                data.attributes.extend_from(&attributes);
                data.inductance.try_insert(
                    &collection,
                    index,
                    InductanceData {
                        attributes,
                        direction,
                    },
                )?;
            }
        }

        if let Some(entries) = section.entries("Dielectric", DIELECTRIC_KEYS)? {
            let collection = section.child_path("Dielectric");
            for entry in entries {
                let index = entry.required_positive("Index")?;
                let dielectric = InterfaceDielectricData::parse(&entry)?;
                entry.finish()?;
                for node in &dielectric.nodes {
                    data.attributes.extend_from(&node.attributes);
                }
                data.dielectric.try_insert(&collection, index, dielectric)?;
            }
        }

        section.finish()?;
        Ok(data)
    }
}

impl InterfaceDielectricData {
    fn parse(entry: &Section<'_>) -> Result<Self, ConfigError> {
        let ts = entry.required("Thickness")?;
        let tandelta = entry.optional("LossTan", 0.0)?;

        let present: Vec<(InterfaceKind, &str)> = InterfaceKind::KEYS
            .into_iter()
            .filter(|(_, key)| entry.contains(key))
            .collect();
        let (kind, key) = match present.as_slice() {
            [one] => *one,
            _ => {
                return Err(entry.conflict(
                    "exactly one of \"Permittivity\", \"PermittivityMA\", \"PermittivityMS\" or \"PermittivitySA\" must be specified",
                ))
            }
        };
        let epsilon_r = entry.required(key)?;

        Ok(Self {
            ts,
            tandelta,
            kind,
            epsilon_r,
            nodes: read_nodes(entry, "\"Dielectric\" boundary postprocessing", INTERFACE_SIDE)?,
        })
    }
}
