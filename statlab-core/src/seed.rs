// statlab-core/src/seed.rs
//! Seed datasets shown when a page is first opened.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::table::{
    GroupRow, PointRow, SampleRow, Table, ValueRow, GROUP_LAYOUT, POPULATION_LAYOUTS, Y_LAYOUT,
};

/// Inclusive range of the random population draws.
pub const POPULATION_RANGE: (i32, i32) = (80, 100);

const TTEST_FIRST: [f64; 5] = [10.0, 15.0, 13.0, 17.0, 19.0];
const TTEST_SECOND: [f64; 5] = [12.0, 14.0, 11.0, 20.0, 18.0];

/// Builds the generator for seed tables and random new rows.
///
/// A fixed `seed` makes every draw reproducible; otherwise the OS provides entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!("Seeding table generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

/// One integer observation in [80, 100], as a float cell value.
pub fn draw_population(rng: &mut dyn RngCore) -> f64 {
    let (lo, hi) = POPULATION_RANGE;
    rng.random_range(lo..=hi) as f64
}

fn sample_table(layout: crate::table::SampleLayout, values: impl IntoIterator<Item = f64>) -> Table<SampleRow> {
    let rows = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| SampleRow { x: ((i + 1) as f64).into(), value: v.into() })
        .collect();
    Table::with_rows(layout, rows)
}

/// The fixed t-test fixture: X 1..5 against two "Y Values" columns.
pub fn ttest_tables() -> [Table<SampleRow>; 2] {
    [
        sample_table(Y_LAYOUT, TTEST_FIRST),
        sample_table(Y_LAYOUT, TTEST_SECOND),
    ]
}

/// Two "Population" tables of `rows` random draws each.
pub fn ztest_tables(rows: usize, rng: &mut dyn RngCore) -> [Table<SampleRow>; 2] {
    let first: Vec<f64> = (0..rows).map(|_| draw_population(rng)).collect();
    let second: Vec<f64> = (0..rows).map(|_| draw_population(rng)).collect();
    [
        sample_table(POPULATION_LAYOUTS[0], first),
        sample_table(POPULATION_LAYOUTS[1], second),
    ]
}

/// Three populations sharing one row index.
pub fn anova_table(rows: usize, rng: &mut dyn RngCore) -> Table<GroupRow> {
    let rows = (1..=rows)
        .map(|i| GroupRow {
            x: (i as f64).into(),
            values: [
                draw_population(rng).into(),
                draw_population(rng).into(),
                draw_population(rng).into(),
            ],
        })
        .collect();
    Table::with_rows(GROUP_LAYOUT, rows)
}

/// The line `y = 2x + 1` sampled at x = 1..=10.
pub fn regression_table() -> Table<PointRow> {
    let rows = (1..=10)
        .map(|i| {
            let x = i as f64;
            PointRow { x: x.into(), y: (2.0 * x + 1.0).into() }
        })
        .collect();
    Table::with_rows((), rows)
}

/// Twenty evenly spaced values from 1 to 20.
pub fn distribution_table() -> Table<ValueRow> {
    let (start, stop, count) = (1.0_f64, 20.0_f64, 20usize);
    let step = (stop - start) / (count - 1) as f64;
    let rows = (0..count)
        .map(|i| ValueRow { value: (start + step * i as f64).into() })
        .collect();
    Table::with_rows((), rows)
}
