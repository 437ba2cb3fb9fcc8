//! # Enum Codecs: Closed Option Families
//!
//! Every enumerated option in a simulation document (problem type, solver
//! kinds, preconditioner side, compression scheme, excitation waveform, …)
//! is a closed Rust enum with a bidirectional mapping to its document
//! literal. There is no "invalid" or "unset" runtime variant: decoding
//! returns `Result<Self, UnknownVariant>`, and the calling validator turns a
//! failure into a field-specific configuration error.
//!
//! Matching is exact and case-sensitive, as in the documents themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::UnknownVariant;

/// Declares a closed option family together with its literal mapping.
///
/// Generates `ALL`, `LITERALS`, `as_str()`, `Display`, `FromStr` and a
/// `Serialize` impl that writes the document literal. An optional
/// `default = Variant` also generates `Default`.
macro_rules! option_family {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal $(, default = $default:ident)? {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Every accepted document literal, in declaration order.
            pub const LITERALS: &'static [&'static str] = &[$( $literal ),+];

            /// The document literal for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $literal ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $literal => Ok(Self::$variant), )+
                    other => Err(UnknownVariant {
                        family: $family,
                        value: other.to_string(),
                        expected: Self::LITERALS,
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        $(
            impl Default for $name {
                fn default() -> Self {
                    Self::$default
                }
            }
        )?
    };
}

option_family! {
    /// The simulation type, selecting which solver subsection is mandatory.
    ProblemType, "problem type" {
        /// Frequency-domain driven response.
        Driven => "Driven",
        /// Eigenmode analysis.
        Eigenmode => "Eigenmode",
        /// Electrostatic capacitance extraction.
        Electrostatic => "Electrostatic",
        /// Magnetostatic inductance extraction.
        Magnetostatic => "Magnetostatic",
        /// Time-domain simulation.
        Transient => "Transient",
    }
}

option_family! {
    /// Eigenvalue solver backend.
    EigenSolverType, "eigensolver type", default = Default {
        Arpack => "ARPACK",
        Slepc => "SLEPc",
        Feast => "FEAST",
        /// Let the solver driver pick a backend.
        Default => "Default",
    }
}

option_family! {
    /// Time integration scheme for transient simulations.
    TimeIntegration, "time integration scheme", default = Default {
        GeneralizedAlpha => "GeneralizedAlpha",
        NewmarkBeta => "NewmarkBeta",
        CentralDifference => "CentralDifference",
        Default => "Default",
    }
}

option_family! {
    /// Time-dependence of the excitation in transient simulations.
    ExcitationWaveform, "excitation waveform" {
        Sinusoidal => "Sinusoidal",
        Gaussian => "Gaussian",
        DifferentiatedGaussian => "DifferentiatedGaussian",
        ModulatedGaussian => "ModulatedGaussian",
        Ramp => "Ramp",
        SmoothStep => "SmoothStep",
    }
}

option_family! {
    /// Linear solver or preconditioner.
    LinearSolverType, "linear solver type", default = Default {
        Ams => "AMS",
        BoomerAmg => "BoomerAMG",
        Mumps => "MUMPS",
        SuperLu => "SuperLU",
        Strumpack => "STRUMPACK",
        /// STRUMPACK in mixed precision.
        StrumpackMp => "STRUMPACK-MP",
        Default => "Default",
    }
}

option_family! {
    /// Krylov subspace method.
    KspType, "Krylov solver type", default = Default {
        Cg => "CG",
        CgSym => "CGSYM",
        Fcg => "FCG",
        Minres => "MINRES",
        Gmres => "GMRES",
        Fgmres => "FGMRES",
        Bcgs => "BCGS",
        Bcgsl => "BCGSL",
        Fbcgs => "FBCGS",
        QmrCgs => "QMRCGS",
        Tfqmr => "TFQMR",
        Default => "Default",
    }
}

option_family! {
    /// Side on which the preconditioner is applied.
    PreconditionerSide, "preconditioner side", default = Default {
        Right => "Right",
        Left => "Left",
        Default => "Default",
    }
}

option_family! {
    /// Fill-reducing reordering for sparse direct solvers.
    SymbolicFactorization, "reordering", default = Default {
        Metis => "METIS",
        ParMetis => "ParMETIS",
        Default => "Default",
    }
}

option_family! {
    /// Low-rank / lossy compression used by STRUMPACK.
    CompressionType, "compression type", default = None {
        None => "None",
        Blr => "BLR",
        Hss => "HSS",
        Hodlr => "HODLR",
        Zfp => "ZFP",
        BlrHodlr => "BLR-HODLR",
        ZfpBlrHodlr => "ZFP-BLR-HODLR",
    }
}
