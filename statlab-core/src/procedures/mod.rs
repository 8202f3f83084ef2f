// statlab-core/src/procedures/mod.rs
//! Concrete implementations of the `StatProcedure` trait, one per page.

pub mod anova;
pub mod distribution;
pub mod regression;
pub mod ttest;
pub mod ztest;

pub use anova::{anova_analysis, Anova};
pub use distribution::{distribution_analysis, Distribution};
pub use regression::{regression_analysis, Regression};
pub use ttest::{ttest_analysis, TTest};
pub use ztest::{ztest_analysis, ZTest};
