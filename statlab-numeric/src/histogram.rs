// statlab-numeric/src/histogram.rs
//! Equal-width frequency histograms.

extern crate alloc;
use alloc::vec::Vec;
use libm::{ceil, floor, log2};

use crate::descriptive::min_max;

/// One histogram bucket covering `[lower, upper)`; the last bucket is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Number of bins for `n` observations by Sturges' rule.
pub fn auto_bins(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    ceil(log2(n as f64)) as usize + 1
}

/// Buckets `values` into `bins` equal-width bins spanning their range.
///
/// All-equal input yields one unit-wide bin centred on the value.
pub fn bin(values: &[f64], bins: usize) -> Vec<Bin> {
    let Some((lo, hi)) = min_max(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    if lo == hi {
        return alloc::vec![Bin { lower: lo - 0.5, upper: hi + 0.5, count: values.len() }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &value in values {
        let slot = floor((value - lo) / width) as usize;
        out[slot.min(bins - 1)].count += 1;
    }
    out
}
