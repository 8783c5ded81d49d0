//! Error and warning types for filter synthesis.

use thiserror::Error;

/// Which expanded polynomial a coefficient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polynomial {
    /// Numerator, expanded from the zeros
    Zeros,
    /// Denominator, expanded from the poles
    Poles,
}

impl std::fmt::Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polynomial::Zeros => write!(f, "zero polynomial"),
            Polynomial::Poles => write!(f, "pole polynomial"),
        }
    }
}

/// Errors that abort a design computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DesignError {
    /// One or more specification constraints were violated.
    ///
    /// Every violated constraint is listed, not just the first.
    #[error("invalid filter specification: {}", .0.join("; "))]
    InvalidSpec(Vec<String>),

    /// A polynomial coefficient came out complex after expansion.
    ///
    /// This indicates poles or zeros that are not closed under conjugation,
    /// i.e. a defect in the synthesis, not bad input.
    #[error("coefficient of z^{power} in the {polynomial} is not real (imaginary part {imag:e})")]
    NonRealCoefficient {
        /// Polynomial holding the bad coefficient.
        polynomial: Polynomial,
        /// Power of the offending term.
        power: usize,
        /// Imaginary part found.
        imag: f64,
    },

    /// Malformed poles-and-zeros text.
    #[error("malformed PAZ data at line {line}: {reason}")]
    Paz {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Non-fatal conditions recorded on a finished design.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignWarning {
    /// The resonator bisection hit its iteration cap; the best estimate is used.
    ResonatorNotConverged {
        /// Iterations performed.
        iterations: usize,
        /// |Im/Re| of the response at the target angle on the last iteration.
        residual: f64,
    },
}

impl std::fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignWarning::ResonatorNotConverged {
                iterations,
                residual,
            } => write!(
                f,
                "resonator pole search did not converge after {iterations} iterations (residual {residual:e})"
            ),
        }
    }
}

/// Result type for design operations.
pub type Result<T> = std::result::Result<T, DesignError>;
