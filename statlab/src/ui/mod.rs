// statlab/src/ui/mod.rs
//! Terminal output: styled messages and result tables.

pub mod output;
pub mod report;
