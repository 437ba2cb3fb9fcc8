//! # Section Reader: Allowlist Extraction with Residual Check
//!
//! A [`Section`] borrows one object node of the generic document tree
//! together with its dotted path and the static list of keys the schema
//! accepts there. Validators pull typed fields out of it and finish with
//! [`Section::finish`], which fails if the node holds any key outside the
//! allowlist.
//!
//! ## Invariant
//!
//! Every key present in the input is either recognized by the section that
//! owns it or reported as an [`ConfigError::UnknownKeys`] error naming that
//! section. The tree itself is never mutated, so validating the same tree
//! twice yields the same result.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::coerce::{self, type_name, CoerceError, Direction, SymmetricTensor};
use crate::error::{ConfigError, UnknownVariant};

/// Two accepted spellings of one semantic entity. At most one may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPair {
    /// The preferred spelling.
    pub canonical: &'static str,
    /// The alternate spelling.
    pub alias: &'static str,
}

/// Which member of an [`AliasPair`] a document used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spelling {
    Canonical,
    Alias,
}

/// An alias pair resolved against a section.
#[derive(Debug, Clone, Copy)]
pub struct Aliased<'a> {
    /// Which spelling was found.
    pub spelling: Spelling,
    /// The key as written in the document.
    pub key: &'static str,
    /// The value under that key.
    pub value: &'a Value,
}

/// Read-only view of one object node, with its accepted keys.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    map: &'a Map<String, Value>,
    allowed: &'static [&'static str],
}

impl<'a> Section<'a> {
    /// View the document root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the root is not an object.
    pub fn root(value: &'a Value, allowed: &'static [&'static str]) -> Result<Self, ConfigError> {
        Self::new("(root)", value, allowed)
    }

    /// View `value` as the section at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if `value` is not an object.
    pub fn new(
        path: impl Into<String>,
        value: &'a Value,
        allowed: &'static [&'static str],
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        match value.as_object() {
            Some(map) => Ok(Self { path, map, allowed }),
            None => {
                let (section, field) = split_path(&path);
                Err(ConfigError::malformed(
                    section,
                    field,
                    format!("expected an object, found {}", type_name(value)),
                ))
            }
        }
    }

    /// Dotted path of this section.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.check_allowed(key);
        self.map.contains_key(key)
    }

    /// Raw value under `key`, if present.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.check_allowed(key);
        self.map.get(key)
    }

    /// Path of a child key of this section.
    pub fn child_path(&self, key: &str) -> String {
        if self.path == "(root)" {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// A [`ConfigError::MissingKey`] for `key` in this section.
    pub fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingKey {
            section: self.path.clone(),
            key: key.to_string(),
        }
    }

    /// A [`ConfigError::Malformed`] for `field` in this section.
    pub fn malformed(&self, field: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::malformed(&self.path, field, reason)
    }

    /// A [`ConfigError::Conflict`] in this section.
    pub fn conflict(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::conflict(&self.path, reason)
    }

    /// Read a required key.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingKey`] if absent, [`ConfigError::Malformed`] if
    /// the value does not have type `T`.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        self.decode(key, value)
    }

    /// Read an optional key, falling back to `default` when absent.
    pub fn optional<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.optional_opt(key)?.unwrap_or(default))
    }

    /// Read an optional key with no default.
    pub fn optional_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key).map(|v| self.decode(key, v)).transpose()
    }

    /// Read a required enumerated option.
    pub fn required_enum<E>(&self, key: &str) -> Result<E, ConfigError>
    where
        E: FromStr<Err = UnknownVariant>,
    {
        let literal: String = self.required(key)?;
        literal
            .parse()
            .map_err(|e: UnknownVariant| e.into_config_error(&self.path, key))
    }

    /// Read an optional enumerated option, falling back to `default`.
    ///
    /// A present key that does not decode is an error even though the key
    /// itself was optional.
    pub fn optional_enum<E>(&self, key: &str, default: E) -> Result<E, ConfigError>
    where
        E: FromStr<Err = UnknownVariant>,
    {
        match self.optional_opt::<String>(key)? {
            Some(literal) => literal
                .parse()
                .map_err(|e: UnknownVariant| e.into_config_error(&self.path, key)),
            None => Ok(default),
        }
    }

    /// Read a required positive integer, e.g. an entity `Index`.
    pub fn required_positive(&self, key: &str) -> Result<u32, ConfigError> {
        let n: i64 = self.required(key)?;
        u32::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| self.malformed(key, format!("must be a positive integer, found {n}")))
    }

    /// Read a scalar-or-array tensor, with basis axes from `axes_key`.
    pub fn tensor<const N: usize>(
        &self,
        key: &str,
        axes_key: &str,
        default: SymmetricTensor<N>,
    ) -> Result<SymmetricTensor<N>, ConfigError> {
        let axes = match self.get(axes_key) {
            Some(v) => coerce::axes_from_value::<N>(v).map_err(|e| self.coerce_error(axes_key, e))?,
            None => default.axes,
        };
        SymmetricTensor::from_value(self.get(key), &default.with_axes(axes))
            .map_err(|e| self.coerce_error(key, e))
    }

    /// Read a required `[lower, upper]` pair, sorted ascending.
    pub fn limits(&self, key: &str) -> Result<[f64; 2], ConfigError> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        coerce::ordered_limits(value).map_err(|e| self.coerce_error(key, e))
    }

    /// Read a required point with `N` coordinates.
    pub fn point<const N: usize>(&self, key: &str) -> Result<[f64; N], ConfigError> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        coerce::point::<N>(value).map_err(|e| self.coerce_error(key, e))
    }

    /// Read an optional direction token.
    pub fn direction(&self, key: &str, allow_radial: bool) -> Result<Option<Direction>, ConfigError> {
        self.optional_opt::<String>(key)?
            .map(|token| Direction::parse(&token, allow_radial).map_err(|e| self.coerce_error(key, e)))
            .transpose()
    }

    /// Read a required direction token.
    pub fn required_direction(&self, key: &str, allow_radial: bool) -> Result<Direction, ConfigError> {
        self.direction(key, allow_radial)?
            .ok_or_else(|| self.missing(key))
    }

    /// Nested object section under `key`, if present.
    pub fn subsection(
        &self,
        key: &str,
        allowed: &'static [&'static str],
    ) -> Result<Option<Section<'a>>, ConfigError> {
        self.get(key)
            .map(|v| Section::new(self.child_path(key), v, allowed))
            .transpose()
    }

    /// Nested object section under a required `key`.
    pub fn required_subsection(
        &self,
        key: &str,
        allowed: &'static [&'static str],
    ) -> Result<Section<'a>, ConfigError> {
        self.subsection(key, allowed)?
            .ok_or_else(|| self.missing(key))
    }

    /// Array of object entries under `key`, if present.
    ///
    /// Entry `i` gets the path `<section>.<key>[i]`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] if the value is not an array or an entry
    /// is not an object.
    pub fn entries(
        &self,
        key: &str,
        allowed: &'static [&'static str],
    ) -> Result<Option<Vec<Section<'a>>>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => Section::array_entries(self.child_path(key), value, allowed).map(Some),
        }
    }

    /// Array of object entries under `key`, where `key` is required.
    pub fn required_entries(
        &self,
        key: &str,
        allowed: &'static [&'static str],
    ) -> Result<Vec<Section<'a>>, ConfigError> {
        self.entries(key, allowed)?
            .ok_or_else(|| self.missing(key))
    }

    /// Split an array value at `path` into object entries.
    pub fn array_entries(
        path: String,
        value: &'a Value,
        allowed: &'static [&'static str],
    ) -> Result<Vec<Section<'a>>, ConfigError> {
        let items = value.as_array().ok_or_else(|| {
            let (section, field) = split_path(&path);
            ConfigError::malformed(
                section,
                field,
                format!("expected an array, found {}", type_name(value)),
            )
        })?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Section::new(format!("{path}[{i}]"), item, allowed))
            .collect()
    }

    /// Resolve an alias pair.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Conflict`] if both spellings are present.
    pub fn alias(&self, pair: AliasPair) -> Result<Option<Aliased<'a>>, ConfigError> {
        match (self.get(pair.canonical), self.get(pair.alias)) {
            (Some(_), Some(_)) => Err(self.conflict(format!(
                "should not specify both \"{}\" and \"{}\"",
                pair.canonical, pair.alias
            ))),
            (Some(value), None) => Ok(Some(Aliased {
                spelling: Spelling::Canonical,
                key: pair.canonical,
                value,
            })),
            (None, Some(value)) => Ok(Some(Aliased {
                spelling: Spelling::Alias,
                key: pair.alias,
                value,
            })),
            (None, None) => Ok(None),
        }
    }

    /// Keys present in the node but not accepted by the schema, in document order.
    pub fn residual_keys(&self) -> Vec<&'a str> {
        self.map
            .keys()
            .map(String::as_str)
            .filter(|k| !self.allowed.contains(k))
            .collect()
    }

    /// Assert that every key present in the node is accepted.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownKeys`] listing the residual keys and a
    /// pretty-printed rendering of their values.
    pub fn finish(&self) -> Result<(), ConfigError> {
        let keys = self.residual_keys();
        if keys.is_empty() {
            return Ok(());
        }
        let residual: Map<String, Value> = keys
            .iter()
            .filter_map(|k| self.map.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect();
        let rendered = serde_json::to_string_pretty(&Value::Object(residual))
            .unwrap_or_else(|_| keys.join(", "));
        Err(ConfigError::UnknownKeys {
            section: self.path.clone(),
            keys: keys.into_iter().map(str::to_string).collect(),
            residual: rendered,
        })
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, value: &Value) -> Result<T, ConfigError> {
        serde_json::from_value(value.clone()).map_err(|e| self.malformed(key, e.to_string()))
    }

    fn coerce_error(&self, key: &str, e: CoerceError) -> ConfigError {
        self.malformed(key, e.to_string())
    }

    fn check_allowed(&self, key: &str) {
        debug_assert!(
            self.allowed.contains(&key),
            "key {key:?} read from {} is missing from its allowlist",
            self.path
        );
    }
}

/// Split `A.B[2].C` into (`A.B[2]`, `C`) for diagnostics about the node itself.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("(root)", path),
    }
}
