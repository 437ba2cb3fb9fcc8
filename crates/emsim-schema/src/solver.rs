//! # Solver Section
//!
//! Solver parameters for each simulation type plus the shared linear
//! solver. The whole section is optional. Each per-type subsection is
//! validated when present, whatever the problem type; which one is
//! mandatory is decided later by the problem type.

use emsim_core::{
    CompressionType, ConfigError, EigenSolverType, ExcitationWaveform, KspType, LinearSolverType,
    PreconditionerSide, Section, SymbolicFactorization, TimeIntegration,
};
use serde::Serialize;

pub(crate) const SOLVER_KEYS: &[&str] = &[
    "Order",
    "Driven",
    "Eigenmode",
    "Electrostatic",
    "Magnetostatic",
    "Transient",
    "Linear",
];
const DRIVEN_KEYS: &[&str] = &[
    "MinFreq",
    "MaxFreq",
    "FreqStep",
    "SaveStep",
    "SaveOnlyPorts",
    "AdaptiveTol",
    "AdaptiveMaxSamples",
    "AdaptiveMaxCandidates",
    "AdaptiveAPosterioriError",
    "Restart",
];
const EIGENMODE_KEYS: &[&str] = &[
    "Target",
    "Tol",
    "MaxIts",
    "MaxSize",
    "N",
    "Save",
    "Type",
    "PEPLinear",
    "ContourNPoints",
    "ContourTargetUpper",
    "ContourAspectRatio",
    "ContourMoments",
    "Scaling",
    "StartVector",
    "StartVectorConstant",
    "MassOrthogonal",
];
const STATIC_KEYS: &[&str] = &["Save"];
const TRANSIENT_KEYS: &[&str] = &[
    "Type",
    "Excitation",
    "ExcitationFreq",
    "ExcitationWidth",
    "MaxTime",
    "TimeStep",
    "SaveStep",
    "SaveOnlyPorts",
];
const LINEAR_KEYS: &[&str] = &[
    "Type",
    "KSPType",
    "Tol",
    "MaxIts",
    "MaxSize",
    "UseMGS",
    "UseCGS2",
    "UseInitialGuess",
    "UseKSPPiped",
    "UseGMG",
    "UseLOR",
    "UsePCShifted",
    "MGCycleIts",
    "MGSmoothIts",
    "MGSmoothOrder",
    "PrecondSide",
    "Reordering",
    "STRUMPACKCompressionType",
    "STRUMPACKCompressionTol",
    "STRUMPACKLossyPrecision",
    "STRUMPACKButterflyLevels",
    "SuperLU3D",
    "AMSVector",
    "DivFreeTol",
    "DivFreeMaxIts",
];

/// Validated `Solver` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverData {
    /// Finite element polynomial order.
    pub order: u32,
    pub driven: Option<DrivenSolverData>,
    pub eigenmode: Option<EigenSolverData>,
    pub electrostatic: StaticSolverData,
    pub magnetostatic: StaticSolverData,
    pub transient: Option<TransientSolverData>,
    pub linear: LinearSolverData,
}

impl Default for SolverData {
    fn default() -> Self {
        Self {
            order: 1,
            driven: None,
            eigenmode: None,
            electrostatic: StaticSolverData::default(),
            magnetostatic: StaticSolverData::default(),
            transient: None,
            linear: LinearSolverData::default(),
        }
    }
}

/// Frequency domain sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrivenSolverData {
    /// Lower and upper frequency, GHz.
    pub min_f: f64,
    pub max_f: f64,
    /// Frequency step, GHz.
    pub delta_f: f64,
    /// Postprocessing interval, GHz; zero disables field output.
    pub delta_post: f64,
    pub only_port_post: bool,
    /// Adaptive fast frequency sweep tolerance; zero disables it.
    pub adaptive_tol: f64,
    pub adaptive_nmax: u32,
    pub adaptive_ncand: u32,
    pub adaptive_metric_aposteriori: bool,
    /// One-based frequency step to restart from.
    pub rst: u32,
}

/// Eigenvalue problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenSolverData {
    /// Target frequency, GHz.
    pub target: f64,
    pub tol: f64,
    pub max_it: u32,
    pub max_size: u32,
    /// Number of eigenmodes to compute.
    pub n: u32,
    /// Number of eigenmodes to write out.
    pub n_post: u32,
    #[serde(rename = "type")]
    pub solver_type: EigenSolverType,
    pub pep_linear: bool,
    pub feast_contour_np: u32,
    pub feast_contour_ub: f64,
    pub feast_contour_ar: f64,
    pub feast_moments: u32,
    pub scale: bool,
    pub init_v0: bool,
    pub init_v0_const: bool,
    pub mass_orthog: bool,
}

/// Electrostatic or magnetostatic solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaticSolverData {
    /// Number of field solutions to write out.
    pub n_post: u32,
}

/// Time domain solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransientSolverData {
    #[serde(rename = "type")]
    pub solver_type: TimeIntegration,
    pub excitation: ExcitationWaveform,
    /// Excitation frequency, GHz.
    pub pulse_f: f64,
    /// Excitation pulse width, ns.
    pub pulse_tau: f64,
    /// Final time and step, ns.
    pub max_t: f64,
    pub delta_t: f64,
    pub delta_post: u32,
    pub only_port_post: bool,
}

/// Linear solver and preconditioner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearSolverData {
    #[serde(rename = "type")]
    pub solver_type: LinearSolverType,
    pub ksp_type: KspType,
    pub tol: f64,
    pub max_it: u32,
    pub max_size: u32,
    pub orthog_mgs: bool,
    pub orthog_cgs2: bool,
    pub ksp_initial_guess: bool,
    pub ksp_piped: bool,
    pub mat_gmg: bool,
    pub mat_lor: bool,
    pub mat_shifted: bool,
    pub mg_cycle_it: u32,
    pub mg_smooth_it: u32,
    pub mg_smooth_order: u32,
    pub pc_side_type: PreconditionerSide,
    pub sym_fact_type: SymbolicFactorization,
    pub strumpack_compression_type: CompressionType,
    pub strumpack_lr_tol: f64,
    pub strumpack_lossy_precision: u32,
    pub strumpack_butterfly_l: u32,
    pub superlu_3d: bool,
    pub ams_vector: bool,
    pub divfree_tol: f64,
    pub divfree_max_it: u32,
}

impl Default for LinearSolverData {
    fn default() -> Self {
        Self {
            solver_type: LinearSolverType::default(),
            ksp_type: KspType::default(),
            tol: 1.0e-6,
            max_it: 100,
            max_size: 0,
            orthog_mgs: false,
            orthog_cgs2: false,
            ksp_initial_guess: true,
            ksp_piped: false,
            mat_gmg: true,
            mat_lor: false,
            mat_shifted: false,
            mg_cycle_it: 1,
            mg_smooth_it: 1,
            mg_smooth_order: 4,
            pc_side_type: PreconditionerSide::default(),
            sym_fact_type: SymbolicFactorization::default(),
            strumpack_compression_type: CompressionType::default(),
            strumpack_lr_tol: 1.0e-3,
            strumpack_lossy_precision: 16,
            strumpack_butterfly_l: 1,
            superlu_3d: false,
            ams_vector: false,
            divfree_tol: 1.0e-12,
            divfree_max_it: 100,
        }
    }
}

impl SolverData {
    pub(crate) fn parse(root: &Section<'_>) -> Result<Self, ConfigError> {
        let Some(solver) = root.subsection("Solver", SOLVER_KEYS)? else {
            return Ok(Self::default());
        };
        let order: i64 = solver.optional("Order", 1)?;
        let order = u32::try_from(order)
            .ok()
            .filter(|&o| o > 0)
            .ok_or_else(|| solver.malformed("Order", format!("solver order should be a positive integer, found {order}")))?;

        let data = Self {
            order,
            driven: solver
                .subsection("Driven", DRIVEN_KEYS)?
                .map(|s| DrivenSolverData::parse(&s))
                .transpose()?,
            eigenmode: solver
                .subsection("Eigenmode", EIGENMODE_KEYS)?
                .map(|s| EigenSolverData::parse(&s))
                .transpose()?,
            electrostatic: StaticSolverData::parse(&solver, "Electrostatic")?,
            magnetostatic: StaticSolverData::parse(&solver, "Magnetostatic")?,
            transient: solver
                .subsection("Transient", TRANSIENT_KEYS)?
                .map(|s| TransientSolverData::parse(&s))
                .transpose()?,
            linear: match solver.subsection("Linear", LINEAR_KEYS)? {
                Some(s) => LinearSolverData::parse(&s)?,
                None => LinearSolverData::default(),
            },
        };
        solver.finish()?;
        tracing::debug!(
            order = data.order,
            driven = data.driven.is_some(),
            eigenmode = data.eigenmode.is_some(),
            transient = data.transient.is_some(),
            linear_type = %data.linear.solver_type,
            ksp_type = %data.linear.ksp_type,
            "parsed Solver"
        );
        Ok(data)
    }
}

impl DrivenSolverData {
    fn parse(s: &Section<'_>) -> Result<Self, ConfigError> {
        let data = Self {
            min_f: s.required("MinFreq")?,
            max_f: s.required("MaxFreq")?,
            delta_f: s.required("FreqStep")?,
            delta_post: s.optional("SaveStep", 0.0)?,
            only_port_post: s.optional("SaveOnlyPorts", false)?,
            adaptive_tol: s.optional("AdaptiveTol", 0.0)?,
            adaptive_nmax: s.optional("AdaptiveMaxSamples", 0)?,
            adaptive_ncand: s.optional("AdaptiveMaxCandidates", 0)?,
            adaptive_metric_aposteriori: s.optional("AdaptiveAPosterioriError", false)?,
            rst: s.optional("Restart", 1)?,
        };
        s.finish()?;
        Ok(data)
    }
}

impl EigenSolverData {
    fn parse(s: &Section<'_>) -> Result<Self, ConfigError> {
        let target = s.required("Target")?;
        let solver_type = s.optional_enum("Type", EigenSolverType::default())?;
        let feast_contour_np = s.optional("ContourNPoints", 0)?;
        if solver_type == EigenSolverType::Feast && feast_contour_np > 1 {
            for key in ["ContourTargetUpper", "ContourAspectRatio"] {
                if !s.contains(key) {
                    return Err(s.missing(key));
                }
            }
        }
        let data = Self {
            target,
            tol: s.optional("Tol", 1.0e-6)?,
            max_it: s.optional("MaxIts", 0)?,
            max_size: s.optional("MaxSize", 0)?,
            n: s.optional("N", 1)?,
            n_post: s.optional("Save", 0)?,
            solver_type,
            pep_linear: s.optional("PEPLinear", true)?,
            feast_contour_np,
            feast_contour_ub: s.optional("ContourTargetUpper", 0.0)?,
            feast_contour_ar: s.optional("ContourAspectRatio", 1.0)?,
            feast_moments: s.optional("ContourMoments", 1)?,
            scale: s.optional("Scaling", true)?,
            init_v0: s.optional("StartVector", true)?,
            init_v0_const: s.optional("StartVectorConstant", false)?,
            mass_orthog: s.optional("MassOrthogonal", false)?,
        };
        s.finish()?;
        Ok(data)
    }
}

impl StaticSolverData {
    fn parse(solver: &Section<'_>, key: &str) -> Result<Self, ConfigError> {
        let Some(s) = solver.subsection(key, STATIC_KEYS)? else {
            return Ok(Self::default());
        };
        let data = Self {
            n_post: s.optional("Save", 0)?,
        };
        s.finish()?;
        Ok(data)
    }
}

impl TransientSolverData {
    fn parse(s: &Section<'_>) -> Result<Self, ConfigError> {
        let data = Self {
            solver_type: s.optional_enum("Type", TimeIntegration::default())?,
            excitation: s.required_enum("Excitation")?,
            pulse_f: s.optional("ExcitationFreq", 0.0)?,
            pulse_tau: s.optional("ExcitationWidth", 0.0)?,
            max_t: s.required("MaxTime")?,
            delta_t: s.required("TimeStep")?,
            delta_post: s.optional("SaveStep", 0)?,
            only_port_post: s.optional("SaveOnlyPorts", false)?,
        };
        s.finish()?;
        Ok(data)
    }
}

impl LinearSolverData {
    fn parse(s: &Section<'_>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let data = Self {
            solver_type: s.optional_enum("Type", d.solver_type)?,
            ksp_type: s.optional_enum("KSPType", d.ksp_type)?,
            tol: s.optional("Tol", d.tol)?,
            max_it: s.optional("MaxIts", d.max_it)?,
            max_size: s.optional("MaxSize", d.max_size)?,
            orthog_mgs: s.optional("UseMGS", d.orthog_mgs)?,
            orthog_cgs2: s.optional("UseCGS2", d.orthog_cgs2)?,
            ksp_initial_guess: s.optional("UseInitialGuess", d.ksp_initial_guess)?,
            ksp_piped: s.optional("UseKSPPiped", d.ksp_piped)?,
            mat_gmg: s.optional("UseGMG", d.mat_gmg)?,
            mat_lor: s.optional("UseLOR", d.mat_lor)?,
            mat_shifted: s.optional("UsePCShifted", d.mat_shifted)?,
            mg_cycle_it: s.optional("MGCycleIts", d.mg_cycle_it)?,
            mg_smooth_it: s.optional("MGSmoothIts", d.mg_smooth_it)?,
            mg_smooth_order: s.optional("MGSmoothOrder", d.mg_smooth_order)?,
            pc_side_type: s.optional_enum("PrecondSide", d.pc_side_type)?,
            sym_fact_type: s.optional_enum("Reordering", d.sym_fact_type)?,
            strumpack_compression_type: s
                .optional_enum("STRUMPACKCompressionType", d.strumpack_compression_type)?,
            strumpack_lr_tol: s.optional("STRUMPACKCompressionTol", d.strumpack_lr_tol)?,
            strumpack_lossy_precision: s
                .optional("STRUMPACKLossyPrecision", d.strumpack_lossy_precision)?,
            strumpack_butterfly_l: s.optional("STRUMPACKButterflyLevels", d.strumpack_butterfly_l)?,
            superlu_3d: s.optional("SuperLU3D", d.superlu_3d)?,
            ams_vector: s.optional("AMSVector", d.ams_vector)?,
            divfree_tol: s.optional("DivFreeTol", d.divfree_tol)?,
            divfree_max_it: s.optional("DivFreeMaxIts", d.divfree_max_it)?,
        };
        s.finish()?;
        Ok(data)
    }
}
