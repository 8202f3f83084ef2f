// statlab-numeric/src/error.rs
use core::fmt;

/// Failure modes of the numerical routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// A sample had fewer observations than the procedure requires.
    TooFewObservations { needed: usize, found: usize },
    /// The pooled variance is zero, so the test statistic is undefined.
    ZeroVariance,
    /// Fewer groups than the procedure requires.
    TooFewGroups { needed: usize, found: usize },
    /// Input slices that must be paired have different lengths.
    LengthMismatch { left: usize, right: usize },
    /// A parameter was outside its domain (e.g. non-positive degrees of freedom).
    InvalidParameter(&'static str),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::TooFewObservations { needed, found } => write!(
                f,
                "need at least {} observations, found {}",
                needed, found
            ),
            NumericError::ZeroVariance => write!(f, "variance is zero"),
            NumericError::TooFewGroups { needed, found } => {
                write!(f, "need at least {} groups, found {}", needed, found)
            }
            NumericError::LengthMismatch { left, right } => {
                write!(f, "paired inputs differ in length ({} vs {})", left, right)
            }
            NumericError::InvalidParameter(what) => write!(f, "invalid parameter: {}", what),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NumericError {}
