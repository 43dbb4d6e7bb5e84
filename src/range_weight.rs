// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Gaussian range weighting for flat range scans.
//!
//! Each range is scaled by an unnormalized Gaussian keyed to its index:
//!
//! ```text
//! center   = N / 2
//! sigma    = center / sigma_divisor
//! weight_i = exp(-((i - center) / sigma)^2 / 2)
//! ```
//!
//! The weight peaks at 1.0 on the center index and decays toward both ends
//! of the scan. The output always has the same length and order as the input.

use crate::lidar::{Error, RangeScan};
use tracing::instrument;

/// Default ratio between the scan half-length and the Gaussian sigma.
pub const DEFAULT_SIGMA_DIVISOR: f64 = 3.0;

/// Deterministic Gaussian reweighting of range measurements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeWeighter {
    sigma_divisor: f64,
}

impl Default for RangeWeighter {
    fn default() -> Self {
        Self {
            sigma_divisor: DEFAULT_SIGMA_DIVISOR,
        }
    }
}

impl RangeWeighter {
    /// Create a weighter with a custom sigma divisor.
    ///
    /// Larger divisors narrow the Gaussian. The divisor must be finite and
    /// strictly positive.
    pub fn new(sigma_divisor: f64) -> Result<Self, Error> {
        if !sigma_divisor.is_finite() || sigma_divisor <= 0.0 {
            return Err(Error::Config(format!(
                "sigma_divisor must be finite and positive, got {}",
                sigma_divisor
            )));
        }
        Ok(Self { sigma_divisor })
    }

    pub fn sigma_divisor(&self) -> f64 {
        self.sigma_divisor
    }

    /// Weight applied to index `index` of a scan with `n` ranges.
    ///
    /// Returns 1.0 for an empty scan so callers never divide by zero.
    #[inline]
    pub fn weight_at(&self, index: usize, n: usize) -> f64 {
        if n == 0 {
            return 1.0;
        }
        let center = n as f64 / 2.0;
        let sigma = center / self.sigma_divisor;
        let z = (index as f64 - center) / sigma;
        (-(z * z) / 2.0).exp()
    }

    /// Scale every range by its positional weight.
    #[instrument(skip_all, fields(n = ranges.len()))]
    pub fn weight(&self, ranges: &[f32]) -> Vec<f32> {
        let n = ranges.len();
        ranges
            .iter()
            .enumerate()
            .map(|(index, &range)| (range as f64 * self.weight_at(index, n)) as f32)
            .collect()
    }

    /// Reweight a scan in place.
    pub fn weight_in_place(&self, ranges: &mut [f32]) {
        let n = ranges.len();
        for (index, range) in ranges.iter_mut().enumerate() {
            *range = (*range as f64 * self.weight_at(index, n)) as f32;
        }
    }

    /// Consume a scan and return its reweighted copy.
    pub fn weight_scan(&self, mut scan: RangeScan) -> RangeScan {
        self.weight_in_place(&mut scan.ranges);
        scan
    }
}
