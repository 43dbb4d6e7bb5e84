// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Stochastic Gaussian subsampling of packed point clouds.
//!
//! Each record of the input cloud is assigned a synthetic azimuth by linear
//! interpolation of its index across the field of view, then kept with
//! probability
//!
//! ```text
//! angle_i = fov_min + (fov_max - fov_min) * i / N
//! p_i     = exp(-(angle_i / half_width)^2)
//! ```
//!
//! With the default ±90° field of view and 45° half width, boresight points
//! are almost always kept while points at the edges survive roughly 2% of
//! the time.
//!
//! Retained records are copied byte-for-byte in their original order. The
//! random source is always supplied by the caller so that a given seed
//! reproduces the same output.

use crate::lidar::{Error, PointCloudBuffer};
use rand::{Rng, SeedableRng as _};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use tracing::{instrument, trace};

/// Default start of the assumed field of view (radians).
pub const DEFAULT_FOV_MIN: f64 = -FRAC_PI_2;
/// Default end of the assumed field of view (radians).
pub const DEFAULT_FOV_MAX: f64 = FRAC_PI_2;
/// Default Gaussian half width of the acceptance curve (radians).
pub const DEFAULT_HALF_WIDTH: f64 = FRAC_PI_4;

/// Gaussian acceptance sampler for [`PointCloudBuffer`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCloudResampler {
    fov_min: f64,
    fov_max: f64,
    half_width: f64,
}

impl Default for PointCloudResampler {
    fn default() -> Self {
        Self {
            fov_min: DEFAULT_FOV_MIN,
            fov_max: DEFAULT_FOV_MAX,
            half_width: DEFAULT_HALF_WIDTH,
        }
    }
}

impl PointCloudResampler {
    /// Create a resampler for a custom field of view and half width.
    ///
    /// # Arguments
    ///
    /// * `fov_min`, `fov_max` - Angles (radians) mapped to the first and one
    ///   past the last record
    /// * `half_width` - Angle (radians) at which acceptance falls to 1/e
    pub fn new(fov_min: f64, fov_max: f64, half_width: f64) -> Result<Self, Error> {
        if !fov_min.is_finite() || !fov_max.is_finite() || !half_width.is_finite() {
            return Err(Error::Config(format!(
                "resampler parameters must be finite: fov [{}, {}], half width {}",
                fov_min, fov_max, half_width
            )));
        }
        if fov_max <= fov_min {
            return Err(Error::Config(format!(
                "fov_max ({}) must be greater than fov_min ({})",
                fov_max, fov_min
            )));
        }
        if half_width <= 0.0 {
            return Err(Error::Config(format!(
                "half_width must be positive, got {}",
                half_width
            )));
        }
        Ok(Self {
            fov_min,
            fov_max,
            half_width,
        })
    }

    pub fn fov(&self) -> (f64, f64) {
        (self.fov_min, self.fov_max)
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Synthetic azimuth of record `index` in a cloud of `n` records.
    #[inline]
    pub fn angle_at(&self, index: usize, n: usize) -> f64 {
        if n == 0 {
            return self.fov_min;
        }
        self.fov_min + (self.fov_max - self.fov_min) * index as f64 / n as f64
    }

    /// Probability of keeping record `index` in a cloud of `n` records.
    #[inline]
    pub fn acceptance(&self, index: usize, n: usize) -> f64 {
        let z = self.angle_at(index, n) / self.half_width;
        (-(z * z)).exp()
    }

    /// Subsample `cloud` drawing one uniform sample per record from `rng`.
    ///
    /// Cloud metadata (fields, endianness, point step) is copied verbatim.
    /// The output is always an unorganized dense cloud: `height == 1`,
    /// `is_dense == true`, `width` is the retained record count and
    /// `row_step == width * point_step`. A zero `point_step` yields an empty
    /// cloud and trailing partial records are dropped.
    #[instrument(skip_all, fields(n = cloud.point_count()))]
    pub fn resample_with<R: Rng>(
        &self,
        cloud: &PointCloudBuffer,
        rng: &mut R,
    ) -> PointCloudBuffer {
        let n_points = cloud.point_count();
        let step = cloud.point_step as usize;

        let mut data = Vec::with_capacity(n_points * step);
        for index in 0..n_points {
            let u: f64 = rng.r#gen();
            if u < self.acceptance(index, n_points) {
                data.extend_from_slice(&cloud.data[index * step..(index + 1) * step]);
            }
        }

        let width = match step {
            0 => 0,
            step => data.len() / step,
        };
        trace!("retained {} of {} points", width, n_points);

        PointCloudBuffer {
            fields: cloud.fields.clone(),
            is_bigendian: cloud.is_bigendian,
            point_step: cloud.point_step,
            row_step: (width * step) as u32,
            height: 1,
            width: width as u32,
            is_dense: true,
            data,
        }
    }

    /// Subsample `cloud` with a fresh generator seeded from `seed`.
    ///
    /// The same input and seed always produce the same output.
    pub fn resample_seeded(&self, cloud: &PointCloudBuffer, seed: u64) -> PointCloudBuffer {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.resample_with(cloud, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{format_points_13byte, standard_xyz_intensity_fields};
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    /// Cloud of `n` 13-byte records whose x coordinate is the record index.
    fn indexed_cloud(n: usize) -> PointCloudBuffer {
        let x: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let y = vec![1.0f32; n];
        let z = vec![-1.0f32; n];
        let intensity: Vec<u8> = (0..n).map(|i| (i % 256) as u8).collect();
        let data = format_points_13byte(&x, &y, &z, &intensity, n);
        PointCloudBuffer::unorganized(standard_xyz_intensity_fields(), 13, data)
    }

    fn source_index(record: &[u8]) -> usize {
        f32::from_le_bytes([record[0], record[1], record[2], record[3]]) as usize
    }

    #[test]
    fn test_acceptance_shape() {
        let resampler = PointCloudResampler::default();
        let n = 1000;
        // index n/2 maps exactly to boresight
        assert_relative_eq!(resampler.angle_at(n / 2, n), 0.0, epsilon = 1e-12);
        assert_relative_eq!(resampler.acceptance(n / 2, n), 1.0, epsilon = 1e-12);
        assert_relative_eq!(resampler.angle_at(0, n), -FRAC_PI_2);
        assert_relative_eq!(resampler.acceptance(0, n), (-4.0f64).exp(), epsilon = 1e-12);
        assert!(resampler.acceptance(100, n) < resampler.acceptance(400, n));
        assert!(resampler.acceptance(900, n) < resampler.acceptance(600, n));
    }

    #[test]
    fn test_order_preserved_and_byte_exact() {
        let resampler = PointCloudResampler::default();
        let cloud = indexed_cloud(2000);
        let out = resampler.resample_seeded(&cloud, 7);

        assert!(out.width > 0);
        let mut last = None;
        for i in 0..out.point_count() {
            let record = out.point(i).unwrap();
            let src = source_index(record);
            assert_eq!(record, cloud.point(src).unwrap());
            if let Some(prev) = last {
                assert!(src > prev, "record {} follows {}", src, prev);
            }
            last = Some(src);
        }
    }

    #[test]
    fn test_metadata_copied() {
        let resampler = PointCloudResampler::default();
        let mut cloud = indexed_cloud(500);
        cloud.is_bigendian = true;
        cloud.is_dense = false;
        cloud.height = 4;

        let out = resampler.resample_seeded(&cloud, 1);
        assert_eq!(out.fields.len(), cloud.fields.len());
        for (a, b) in out.fields.iter().zip(cloud.fields.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.offset, b.offset);
            assert_eq!(a.datatype, b.datatype);
            assert_eq!(a.count, b.count);
        }
        assert!(out.is_bigendian);
        assert_eq!(out.point_step, 13);
        assert_eq!(out.height, 1);
        assert!(out.is_dense);
        assert_eq!(out.row_step, out.width * 13);
        assert_eq!(out.data.len(), out.row_step as usize);
    }

    #[test]
    fn test_bounded_output() {
        let resampler = PointCloudResampler::default();
        let cloud = indexed_cloud(300);
        for seed in 0..20 {
            let out = resampler.resample_seeded(&cloud, seed);
            assert!(out.width as usize <= cloud.point_count());
        }
    }

    #[test]
    fn test_zero_point_step() {
        let resampler = PointCloudResampler::default();
        let cloud = PointCloudBuffer::unorganized(standard_xyz_intensity_fields(), 0, vec![7; 64]);
        let out = resampler.resample_seeded(&cloud, 3);
        assert_eq!(out.width, 0);
        assert_eq!(out.row_step, 0);
        assert!(out.data.is_empty());
        assert_eq!(out.fields.len(), 4);
    }

    #[test]
    fn test_empty_cloud() {
        let resampler = PointCloudResampler::default();
        let out = resampler.resample_seeded(&PointCloudBuffer::default(), 3);
        assert_eq!(out.width, 0);
        assert!(out.data.is_empty());
    }

    #[test]
    fn test_trailing_bytes_dropped() {
        let resampler = PointCloudResampler::default();
        let mut cloud = indexed_cloud(200);
        cloud.data.extend_from_slice(&[0xAB; 5]);
        let out = resampler.resample_seeded(&cloud, 11);
        assert_eq!(out.data.len() % 13, 0);
        for i in 0..out.point_count() {
            assert!(source_index(out.point(i).unwrap()) < 200);
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let resampler = PointCloudResampler::default();
        let cloud = indexed_cloud(5000);
        let a = resampler.resample_seeded(&cloud, 42);
        let b = resampler.resample_seeded(&cloud, 42);
        assert_eq!(a.data, b.data);
        assert_eq!(a.width, b.width);

        let c = resampler.resample_seeded(&cloud, 43);
        assert_ne!(a.data, c.data);
    }

    #[test]
    fn test_injected_generator() {
        let resampler = PointCloudResampler::default();
        let cloud = indexed_cloud(1000);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let injected = resampler.resample_with(&cloud, &mut rng);
        assert_eq!(injected.data, resampler.resample_seeded(&cloud, 99).data);
    }

    #[test]
    fn test_density_shape() {
        let resampler = PointCloudResampler::default();
        let n = 10_000;
        let cloud = indexed_cloud(n);
        let out = resampler.resample_seeded(&cloud, 2025);

        let mut kept = vec![false; n];
        for i in 0..out.point_count() {
            kept[source_index(out.point(i).unwrap())] = true;
        }

        let ratio = |lo: f64, hi: f64| {
            let (total, retained) = (0..n)
                .filter(|&i| {
                    let a = resampler.angle_at(i, n).abs();
                    a >= lo && a < hi
                })
                .fold((0usize, 0usize), |(t, r), i| (t + 1, r + kept[i] as usize));
            retained as f64 / total as f64
        };

        let center = ratio(0.0, 0.1);
        let edge = ratio(1.4, 2.0);
        assert!(center > 0.9, "center retention {}", center);
        assert!(
            center > 5.0 * edge,
            "center {} not dominant over edge {}",
            center,
            edge
        );
    }

    #[test]
    fn test_custom_fov() {
        let resampler = PointCloudResampler::new(-0.5, 0.5, 0.25).unwrap();
        assert_eq!(resampler.fov(), (-0.5, 0.5));
        assert_relative_eq!(resampler.angle_at(50, 100), 0.0, epsilon = 1e-12);
        assert_relative_eq!(resampler.acceptance(0, 100), (-4.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            PointCloudResampler::new(0.5, -0.5, 0.25),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PointCloudResampler::new(0.0, 0.0, 0.25),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PointCloudResampler::new(-1.0, 1.0, 0.0),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PointCloudResampler::new(f64::NEG_INFINITY, 1.0, 0.5),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PointCloudResampler::new(-1.0, 1.0, f64::NAN),
            Err(Error::Config(_))
        ));
    }
}
