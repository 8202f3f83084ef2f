// statlab-numeric/src/hypothesis.rs
//! Two-sample tests and one-way ANOVA.

use libm::sqrt;

use crate::descriptive::SampleStats;
use crate::distribution::{Distribution, FisherSnedecor, StandardNormal, StudentsT};
use crate::{NumericError, Result};

/// Outcome of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    /// The test statistic (t, z or F).
    pub statistic: f64,
    /// Two-sided p-value for t and z, upper tail for F.
    pub p_value: f64,
    /// Degrees of freedom, where the reference distribution has any.
    pub df: Option<f64>,
}

/// Variance assumption for the two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceAssumption {
    /// Student's t-test with pooled variance.
    #[default]
    Pooled,
    /// Welch's t-test.
    Welch,
}

fn two_samples(x: &[f64], y: &[f64]) -> Result<(SampleStats, SampleStats)> {
    for sample in [x, y] {
        if sample.len() < 2 {
            return Err(NumericError::TooFewObservations { needed: 2, found: sample.len() });
        }
    }
    // Both slices are non-empty here.
    match (SampleStats::from_slice(x), SampleStats::from_slice(y)) {
        (Some(sx), Some(sy)) => Ok((sx, sy)),
        _ => Err(NumericError::TooFewObservations { needed: 2, found: 0 }),
    }
}

/// Standard error of the mean difference under the pooled-variance model.
fn pooled_standard_error(sx: &SampleStats, sy: &SampleStats) -> f64 {
    let nx = sx.n as f64;
    let ny = sy.n as f64;
    let pooled = (sx.sum_sq + sy.sum_sq) / (nx + ny - 2.0);
    sqrt(pooled * (1.0 / nx + 1.0 / ny))
}

/// Independent two-sample t-test.
pub fn t_test_ind(x: &[f64], y: &[f64], assumption: VarianceAssumption) -> Result<TestResult> {
    let (sx, sy) = two_samples(x, y)?;
    let nx = sx.n as f64;
    let ny = sy.n as f64;

    let (se, df) = match assumption {
        VarianceAssumption::Pooled => (pooled_standard_error(&sx, &sy), nx + ny - 2.0),
        VarianceAssumption::Welch => {
            let vx = sx.sum_sq / (nx - 1.0) / nx;
            let vy = sy.sum_sq / (ny - 1.0) / ny;
            let denom = vx * vx / (nx - 1.0) + vy * vy / (ny - 1.0);
            (sqrt(vx + vy), (vx + vy) * (vx + vy) / denom)
        }
    };

    if se == 0.0 {
        return Err(NumericError::ZeroVariance);
    }

    let t = (sx.mean - sy.mean) / se;
    let p_value = StudentsT::new(df)?.two_tailed(t);

    Ok(TestResult { statistic: t, p_value, df: Some(df) })
}

/// Two-sample z-test for the difference of means, two-sided.
///
/// The variance of the difference is estimated from the pooled sample
/// variance, `(SS_x + SS_y) / (n_x + n_y - 2) * (1/n_x + 1/n_y)`.
pub fn z_test_ind(x: &[f64], y: &[f64]) -> Result<TestResult> {
    let (sx, sy) = two_samples(x, y)?;
    let se = pooled_standard_error(&sx, &sy);
    if se == 0.0 {
        return Err(NumericError::ZeroVariance);
    }

    let z = (sx.mean - sy.mean) / se;
    let p_value = 2.0 * StandardNormal.sf(libm::fabs(z));

    Ok(TestResult { statistic: z, p_value, df: None })
}

/// One-way analysis of variance across `groups`.
///
/// Zero within-group variance is not an error: the F statistic becomes
/// infinite (or NaN when the group means also coincide) and the p-value
/// follows from it.
pub fn f_oneway(groups: &[&[f64]]) -> Result<TestResult> {
    let k = groups.len();
    if k < 2 {
        return Err(NumericError::TooFewGroups { needed: 2, found: k });
    }

    let mut stats = alloc::vec::Vec::with_capacity(k);
    for group in groups {
        match SampleStats::from_slice(group) {
            Some(s) => stats.push(s),
            None => return Err(NumericError::TooFewObservations { needed: 1, found: 0 }),
        }
    }

    let n_total: usize = stats.iter().map(|s| s.n).sum();
    if n_total <= k {
        return Err(NumericError::TooFewObservations { needed: k + 1, found: n_total });
    }

    let grand_mean = stats.iter().map(|s| s.mean * s.n as f64).sum::<f64>() / n_total as f64;
    let ss_between: f64 = stats
        .iter()
        .map(|s| {
            let diff = s.mean - grand_mean;
            s.n as f64 * diff * diff
        })
        .sum();
    let ss_within: f64 = stats.iter().map(|s| s.sum_sq).sum();

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p_value = FisherSnedecor::new(df_between, df_within)?.sf(f);

    Ok(TestResult { statistic: f, p_value, df: Some(df_between) })
}
