// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! EdgeFirst LiDAR Foveation Library
//!
//! Transforms uniformly sampled LiDAR scans into non-uniformly weighted
//! variants that emphasize the boresight, emulating sensors that sample
//! densely ahead and sparsely at the edges of their field of view.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────────┐     ┌──────────────┐
//! │  inbound     │ ──► │  RangeWeighter          │ ──► │  outbound    │
//! │  LaserScan / │     │  PointCloudResampler    │     │  LaserScan / │
//! │  PointCloud2 │     │  (pure, per-call state) │     │  PointCloud2 │
//! └──────────────┘     └─────────────────────────┘     └──────────────┘
//! ```
//!
//! The transforms are pure functions over a single scan. They never fail:
//! degenerate input (empty scans, zero point step) produces an empty or
//! trivial output. Transport is left to the binary, which connects zenoh
//! subscribers to the transforms through bounded channels.
//!
//! # Modules
//!
//! - [`lidar`]: Scan data model and error handling
//! - [`range_weight`]: Deterministic Gaussian range weighting
//! - [`resample`]: Seedable Gaussian point cloud subsampling
//! - [`formats`]: Packed point record helpers
//! - [`messages`]: ROS2 CDR messages and payload-level transforms
//!
//! # Example
//!
//! ```
//! use edgefirst_foveate::{PointCloudBuffer, PointCloudResampler, RangeWeighter};
//! use edgefirst_foveate::formats::{format_points_13byte, standard_xyz_intensity_fields};
//!
//! let weighted = RangeWeighter::default().weight(&[1.0, 1.0, 1.0, 1.0]);
//! assert_eq!(weighted.len(), 4);
//! assert!((weighted[2] - 1.0).abs() < 1e-6);
//!
//! let n = 100;
//! let x = vec![1.0f32; n];
//! let data = format_points_13byte(&x, &x, &x, &vec![0u8; n], n);
//! let cloud = PointCloudBuffer::unorganized(standard_xyz_intensity_fields(), 13, data);
//! let resampled = PointCloudResampler::default().resample_seeded(&cloud, 42);
//! assert!(resampled.width as usize <= n);
//! ```

pub mod formats;
pub mod lidar;
pub mod messages;
pub mod range_weight;
pub mod resample;

// Re-exports for convenience
pub use formats::PointFieldType;
pub use lidar::{Error, PointCloudBuffer, RangeScan};
pub use range_weight::RangeWeighter;
pub use resample::PointCloudResampler;
