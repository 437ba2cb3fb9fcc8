//! # Leaf Coercers
//!
//! Small value-level conversions shared by every section validator:
//!
//! - [`SymmetricTensor`]: a material property given either as a scalar
//!   (broadcast to an isotropic diagonal) or as an explicit N-length
//!   diagonal, together with the basis axes the diagonal is expressed in.
//! - [`Direction`]: a signed coordinate axis (`+x`, `-y`, `+r`, …) parsed
//!   from a case-insensitive token, where a bare axis letter means `+`.
//! - [`ordered_limits`] and [`point`]: exact-length numeric arrays for
//!   bounding boxes and centers.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// A diagonal tensor of order `N` together with its basis axes.
///
/// `axes[i]` is the direction along which `diagonal[i]` acts. When no axes
/// are given in the document, the default coordinate frame (identity) is
/// used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricTensor<const N: usize> {
    /// Principal values.
    pub diagonal: [f64; N],
    /// Basis axes, one per principal value.
    pub axes: [[f64; N]; N],
}

impl<const N: usize> SymmetricTensor<N> {
    /// An isotropic tensor: `s` in every diagonal slot, default axes.
    pub fn isotropic(s: f64) -> Self {
        Self {
            diagonal: [s; N],
            axes: identity_axes(),
        }
    }

    /// Decode the scalar-or-array form of a tensor value.
    ///
    /// An array must hold exactly `N` numbers. Anything else must be a
    /// single number, broadcast to every slot. `None` (key absent) keeps
    /// the diagonal of `default`. The axes are taken from `default`.
    pub fn from_value(value: Option<&Value>, default: &Self) -> Result<Self, CoerceError> {
        let diagonal = match value {
            None => default.diagonal,
            Some(v @ Value::Array(_)) => fixed_array::<N>(v)?,
            Some(v) => {
                let s = v.as_f64().ok_or_else(|| CoerceError::NotANumber {
                    found: type_name(v),
                })?;
                [s; N]
            }
        };
        Ok(Self {
            diagonal,
            axes: default.axes,
        })
    }

    /// Replace the basis axes.
    pub fn with_axes(mut self, axes: [[f64; N]; N]) -> Self {
        self.axes = axes;
        self
    }
}

impl<const N: usize> Serialize for SymmetricTensor<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let axes: Vec<&[f64]> = self.axes.iter().map(|a| a.as_slice()).collect();
        let mut state = serializer.serialize_struct("SymmetricTensor", 2)?;
        state.serialize_field("diagonal", self.diagonal.as_slice())?;
        state.serialize_field("axes", &axes)?;
        state.end()
    }
}

/// The default coordinate frame: `axes[i]` is the i-th unit vector.
pub fn identity_axes<const N: usize>() -> [[f64; N]; N] {
    let mut axes = [[0.0; N]; N];
    for (i, row) in axes.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    axes
}

/// Decode a set of `N` basis axes, each an `N`-component vector.
pub fn axes_from_value<const N: usize>(value: &Value) -> Result<[[f64; N]; N], CoerceError> {
    let rows = value.as_array().ok_or_else(|| CoerceError::NotAnArray {
        found: type_name(value),
    })?;
    if rows.len() != N {
        return Err(CoerceError::WrongLength {
            expected: N,
            found: rows.len(),
        });
    }
    let mut axes = [[0.0; N]; N];
    for (slot, row) in axes.iter_mut().zip(rows) {
        *slot = fixed_array::<N>(row)?;
    }
    Ok(axes)
}

/// Decode an array of exactly `N` numbers.
pub fn fixed_array<const N: usize>(value: &Value) -> Result<[f64; N], CoerceError> {
    let items = value.as_array().ok_or_else(|| CoerceError::NotAnArray {
        found: type_name(value),
    })?;
    if items.len() != N {
        return Err(CoerceError::WrongLength {
            expected: N,
            found: items.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(|| CoerceError::NotANumber {
            found: type_name(item),
        })?;
    }
    Ok(out)
}

/// Decode a `[lower, upper]` pair, swapping it into increasing order.
pub fn ordered_limits(value: &Value) -> Result<[f64; 2], CoerceError> {
    let [a, b] = fixed_array::<2>(value)?;
    Ok(if b < a { [b, a] } else { [a, b] })
}

/// Decode a point with exactly `N` coordinates.
pub fn point<const N: usize>(value: &Value) -> Result<[f64; N], CoerceError> {
    fixed_array::<N>(value)
}

/// Error from a leaf coercion. Validators attach the section and field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// Expected an array.
    #[error("expected an array, found {found}")]
    NotAnArray {
        /// JSON type of the value found.
        found: &'static str,
    },
    /// Expected a number.
    #[error("expected a number, found {found}")]
    NotANumber {
        /// JSON type of the value found.
        found: &'static str,
    },
    /// Array of the wrong length.
    #[error("expected an array of length {expected}, found length {found}")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// Direction token not of the form `x`, `+x` or `-x`.
    #[error("invalid direction or side {token:?} (expected x, y, z{radial}, optionally prefixed with + or -)")]
    InvalidDirection {
        /// The rejected token, as given.
        token: String,
        /// ", r" when radial directions are accepted, empty otherwise.
        radial: &'static str,
    },
}

/// Human-readable JSON type name, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    /// Radial direction, only meaningful for port excitations.
    R,
}

impl Axis {
    fn from_char(c: char, allow_radial: bool) -> Option<Self> {
        match c {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            'r' if allow_radial => Some(Self::R),
            _ => None,
        }
    }

    /// Lower-case axis letter.
    pub fn as_char(&self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
            Self::R => 'r',
        }
    }
}

/// Orientation along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

/// A signed axis such as `+x` or `-r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    /// Orientation.
    pub sign: Sign,
    /// Axis.
    pub axis: Axis,
}

impl Direction {
    /// Parse a direction token.
    ///
    /// The token is lower-cased first. Accepted forms are a bare axis
    /// letter (`x`, `y`, `z`, and `r` when `allow_radial`) or a signed
    /// one (`+x`, `-y`, …). A bare letter means the positive direction.
    pub fn parse(token: &str, allow_radial: bool) -> Result<Self, CoerceError> {
        let lower = token.to_lowercase();
        let mut chars = lower.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(a), None, None) => {
                Axis::from_char(a, allow_radial).map(|axis| Self { sign: Sign::Plus, axis })
            }
            (Some(s @ ('+' | '-')), Some(a), None) => {
                Axis::from_char(a, allow_radial).map(|axis| Self {
                    sign: if s == '+' { Sign::Plus } else { Sign::Minus },
                    axis,
                })
            }
            _ => None,
        };
        parsed.ok_or_else(|| CoerceError::InvalidDirection {
            token: token.to_string(),
            radial: if allow_radial { ", r" } else { "" },
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            Sign::Plus => '+',
            Sign::Minus => '-',
        };
        write!(f, "{sign}{}", self.axis.as_char())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalize a direction token to its canonical signed, lower-case form.
///
/// `"x"` becomes `"+x"`, `"-Y"` becomes `"-y"`; anything else is rejected.
pub fn normalize_direction(token: &str, allow_radial: bool) -> Result<String, CoerceError> {
    Direction::parse(token, allow_radial).map(|d| d.to_string())
}
