//! # Attributes-or-Elements
//!
//! Ports, surface current sources and interface dielectric entries may be
//! declared either with one flat `Attributes` list (plus an optional
//! direction/side tag) or with an `Elements` list of per-element
//! `{Attributes, Direction}` objects. Both forms normalize to a list of
//! [`Node`]s. Tags are always read from the node that declares them: with
//! `Elements`, each element carries its own tag and a top-level tag is
//! rejected.

use emsim_core::{ConfigError, Direction, Section};
use serde::Serialize;

/// One element group of a multi-element boundary entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Boundary attributes of this element, ascending.
    pub attributes: Vec<i32>,
    /// Orientation (ports, sources) or side (interfaces), if any.
    pub direction: Option<Direction>,
}

/// How the direction/side tag of a node is read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TagRule {
    /// Key holding the tag (`Direction` or `Side`).
    pub key: &'static str,
    /// Allowlist for objects inside `Elements`.
    pub element_keys: &'static [&'static str],
    /// Whether the tag must be present.
    pub required: bool,
    /// Whether the radial axis `r` is accepted.
    pub allow_radial: bool,
    /// Accept the tag without validating or storing it.
    pub ignored: bool,
    /// Treat an empty string tag as absent.
    pub empty_is_unset: bool,
}

pub(crate) const DIRECTION_ELEMENT_KEYS: &[&str] = &["Attributes", "Direction"];
pub(crate) const SIDE_ELEMENT_KEYS: &[&str] = &["Attributes", "Side"];

/// Read a sorted boundary attribute list.
pub(crate) fn boundary_attributes(section: &Section<'_>) -> Result<Vec<i32>, ConfigError> {
    let mut attributes: Vec<i32> = section.required("Attributes")?;
    attributes.sort_unstable();
    Ok(attributes)
}

/// Normalize the Attributes-or-Elements forms of `entry` into nodes.
///
/// # Errors
///
/// [`ConfigError::Conflict`] if both or neither of `Attributes` and
/// `Elements` are given, or if a top-level tag accompanies `Elements`.
pub(crate) fn read_nodes(
    entry: &Section<'_>,
    entity: &str,
    rule: TagRule,
) -> Result<Vec<Node>, ConfigError> {
    match (entry.contains("Attributes"), entry.contains("Elements")) {
        (true, true) => Err(entry.conflict(format!(
            "cannot specify both top-level \"Attributes\" list and \"Elements\" for {entity}"
        ))),
        (true, false) => Ok(vec![read_node(entry, rule)?]),
        (false, true) => {
            if entry.contains(rule.key) {
                return Err(entry.conflict(format!(
                    "\"{}\" must be given per element when {entity} uses \"Elements\"",
                    rule.key
                )));
            }
            let elements = entry.required_entries("Elements", rule.element_keys)?;
            if elements.is_empty() {
                return Err(entry.malformed("Elements", "must list at least one element"));
            }
            elements
                .iter()
                .map(|element| {
                    let node = read_node(element, rule)?;
                    element.finish()?;
                    Ok(node)
                })
                .collect()
        }
        (false, false) => Err(entry.conflict(format!(
            "missing top-level \"Attributes\" list or \"Elements\" for {entity}"
        ))),
    }
}

fn read_node(section: &Section<'_>, rule: TagRule) -> Result<Node, ConfigError> {
    let attributes = boundary_attributes(section)?;
    let direction = if rule.ignored {
        if let Some(tag) = section.get(rule.key) {
            tracing::warn!(
                section = section.path(),
                tag = %tag,
                "ignoring \"{}\" (not validated for this boundary kind)",
                rule.key
            );
        }
        None
    } else if rule.empty_is_unset && section.get(rule.key).and_then(|v| v.as_str()) == Some("") {
        None
    } else if rule.required {
        Some(section.required_direction(rule.key, rule.allow_radial)?)
    } else {
        section.direction(rule.key, rule.allow_radial)?
    };
    Ok(Node {
        attributes,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emsim_core::ErrorKind;
    use serde_json::json;

    const ENTRY_KEYS: &[&str] = &["Index", "Attributes", "Direction", "Elements"];

    const PORT: TagRule = TagRule {
        key: "Direction",
        element_keys: DIRECTION_ELEMENT_KEYS,
        required: true,
        allow_radial: true,
        ignored: false,
        empty_is_unset: false,
    };

    fn nodes(doc: &serde_json::Value, rule: TagRule) -> Result<Vec<Node>, ConfigError> {
        let entry = Section::new("Boundaries.LumpedPort[0]", doc, ENTRY_KEYS)?;
        read_nodes(&entry, "\"LumpedPort\" boundary", rule)
    }

    #[test]
    fn test_flat_attributes_form() {
        let n = nodes(&json!({"Attributes": [4, 2], "Direction": "x"}), PORT).unwrap();
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].attributes, vec![2, 4]);
        assert_eq!(n[0].direction.unwrap().to_string(), "+x");
    }

    #[test]
    fn test_elements_form_reads_node_local_tags() {
        let doc = json!({"Elements": [
            {"Attributes": [1], "Direction": "+z"},
            {"Attributes": [2], "Direction": "-R"}
        ]});
        let n = nodes(&doc, PORT).unwrap();
        assert_eq!(n.len(), 2);
        assert_eq!(n[0].direction.unwrap().to_string(), "+z");
        assert_eq!(n[1].direction.unwrap().to_string(), "-r");
        assert_eq!(n[1].attributes, vec![2]);
    }

    #[test]
    fn test_both_forms_conflict() {
        let doc = json!({"Attributes": [1], "Direction": "x", "Elements": []});
        assert_eq!(nodes(&doc, PORT).unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_neither_form_conflict() {
        let err = nodes(&json!({"Direction": "x"}), PORT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("\"Elements\""));
    }

    #[test]
    fn test_top_level_tag_with_elements_rejected() {
        let doc = json!({"Direction": "x", "Elements": [{"Attributes": [1], "Direction": "y"}]});
        assert_eq!(nodes(&doc, PORT).unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_element_residual_key() {
        let doc = json!({"Elements": [{"Attributes": [1], "Direction": "y", "Dir": "x"}]});
        let err = nodes(&doc, PORT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownKeys);
        assert_eq!(err.section(), "Boundaries.LumpedPort[0].Elements[0]");
    }

    #[test]
    fn test_required_direction_missing() {
        let err = nodes(&json!({"Attributes": [1]}), PORT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
    }

    #[test]
    fn test_ignored_tag_accepts_anything() {
        let rule = TagRule {
            ignored: true,
            ..PORT
        };
        let n = nodes(&json!({"Attributes": [1], "Direction": "diagonal"}), rule).unwrap();
        assert_eq!(n[0].direction, None);
    }

    #[test]
    fn test_empty_tag_is_invalid_unless_unset_allowed() {
        let err = nodes(&json!({"Attributes": [1], "Direction": ""}), PORT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let rule = TagRule {
            required: false,
            empty_is_unset: true,
            ..PORT
        };
        let n = nodes(&json!({"Attributes": [1], "Direction": ""}), rule).unwrap();
        assert_eq!(n[0].direction, None);
    }

    #[test]
    fn test_element_without_attributes() {
        let doc = json!({"Elements": [
            {"Attributes": [1], "Direction": "x"},
            {"Direction": "y"}
        ]});
        let err = nodes(&doc, PORT).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingKey {
                section: "Boundaries.LumpedPort[0].Elements[1]".into(),
                key: "Attributes".into()
            }
        );
    }

    #[test]
    fn test_empty_elements_rejected() {
        let err = nodes(&json!({"Elements": []}), PORT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
