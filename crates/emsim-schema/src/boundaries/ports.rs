//! Port excitations and surface current sources.

use emsim_core::{ConfigError, IndexedMap, Section, Spelling};
use serde::Serialize;

use super::PORT;
use crate::nodes::{boundary_attributes, read_nodes, Node, TagRule, DIRECTION_ELEMENT_KEYS};

const LUMPED_PORT_KEYS: &[&str] = &[
    "Index",
    "R",
    "L",
    "C",
    "Rs",
    "Ls",
    "Cs",
    "Excitation",
    "Attributes",
    "Direction",
    "Elements",
];
const WAVE_PORT_KEYS: &[&str] = &["Index", "Attributes", "Mode", "Offset", "Excitation"];
const SURFACE_CURRENT_KEYS: &[&str] = &["Index", "Attributes", "Direction", "Elements"];

const PORT_DIRECTION: TagRule = TagRule {
    key: "Direction",
    element_keys: DIRECTION_ELEMENT_KEYS,
    required: true,
    allow_radial: true,
    ignored: false,
    empty_is_unset: false,
};

/// Terminals are electrostatic: the direction key is tolerated, never used.
const TERMINAL_DIRECTION: TagRule = TagRule {
    ignored: true,
    ..PORT_DIRECTION
};

/// A lumped port (or terminal) with its circuit parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LumpedPortData {
    /// Circuit resistance, inductance and capacitance.
    pub r: f64,
    pub l: f64,
    pub c: f64,
    /// Per-square surface resistance, inductance and capacitance.
    pub rs: f64,
    pub ls: f64,
    pub cs: f64,
    /// Whether this port is excited.
    pub excitation: bool,
    /// Element groups of the port. Terminal nodes carry no direction.
    pub nodes: Vec<Node>,
}

/// A numeric wave port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WavePortData {
    pub attributes: Vec<i32>,
    /// One-based index of the port mode.
    pub mode: u32,
    /// De-embedding offset distance.
    pub d_offset: f64,
    pub excitation: bool,
}

/// A surface current source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceCurrentData {
    pub nodes: Vec<Node>,
}

pub(super) fn parse_lumped_ports(
    boundaries: &Section<'_>,
) -> Result<IndexedMap<LumpedPortData>, ConfigError> {
    let mut ports = IndexedMap::new();
    let Some(found) = boundaries.alias(PORT)? else {
        return Ok(ports);
    };
    let (rule, entity) = match found.spelling {
        Spelling::Canonical => (PORT_DIRECTION, "\"LumpedPort\" boundary"),
        Spelling::Alias => (TERMINAL_DIRECTION, "\"Terminal\" boundary"),
    };
    let collection = boundaries.child_path(found.key);
    for entry in Section::array_entries(collection.clone(), found.value, LUMPED_PORT_KEYS)? {
        let index = entry.required_positive("Index")?;
        let port = LumpedPortData {
            r: entry.optional("R", 0.0)?,
            l: entry.optional("L", 0.0)?,
            c: entry.optional("C", 0.0)?,
            rs: entry.optional("Rs", 0.0)?,
            ls: entry.optional("Ls", 0.0)?,
            cs: entry.optional("Cs", 0.0)?,
            excitation: entry.optional("Excitation", false)?,
            nodes: read_nodes(&entry, entity, rule)?,
        };
        entry.finish()?;
        ports.try_insert(&collection, index, port)?;
    }
    Ok(ports)
}

pub(super) fn parse_wave_ports(
    boundaries: &Section<'_>,
) -> Result<IndexedMap<WavePortData>, ConfigError> {
    let mut ports = IndexedMap::new();
    let Some(entries) = boundaries.entries("WavePort", WAVE_PORT_KEYS)? else {
        return Ok(ports);
    };
    let collection = boundaries.child_path("WavePort");
    for entry in entries {
        let index = entry.required_positive("Index")?;
        let attributes = boundary_attributes(&entry)?;
        let mode: i64 = entry.optional("Mode", 1)?;
        let mode = u32::try_from(mode)
            .ok()
            .filter(|&m| m > 0)
            .ok_or_else(|| entry.malformed("Mode", format!("wave port mode index should be a positive integer, found {mode}")))?;
        let port = WavePortData {
            attributes,
            mode,
            d_offset: entry.optional("Offset", 0.0)?,
            excitation: entry.optional("Excitation", false)?,
        };
        entry.finish()?;
        ports.try_insert(&collection, index, port)?;
    }
    Ok(ports)
}

pub(super) fn parse_surface_currents(
    boundaries: &Section<'_>,
) -> Result<IndexedMap<SurfaceCurrentData>, ConfigError> {
    let mut sources = IndexedMap::new();
    let Some(entries) = boundaries.entries("SurfaceCurrent", SURFACE_CURRENT_KEYS)? else {
        return Ok(sources);
    };
    let collection = boundaries.child_path("SurfaceCurrent");
    for entry in entries {
        let index = entry.required_positive("Index")?;
        let nodes = read_nodes(&entry, "\"SurfaceCurrent\" boundary", PORT_DIRECTION)?;
        entry.finish()?;
        sources.try_insert(&collection, index, SurfaceCurrentData { nodes })?;
    }
    Ok(sources)
}
