// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Common LiDAR scan types and error handling.
//!
//! Both scan representations are transient: they are built from an incoming
//! message, consumed by a single transform call and handed to the output.
//!
//! # Ordering precondition
//!
//! Index order is assumed to be angular order across the field of view, for
//! both [`RangeScan::ranges`] and the records of [`PointCloudBuffer::data`].
//! Neither transform verifies this; a cloud reordered upstream (for example
//! sorted by range or grouped by ring) still transforms without error but the
//! density emphasis lands on the wrong points.

use edgefirst_schemas::{sensor_msgs::PointField, serde_cdr};
use std::fmt;

/// Flat range scan, one distance per beam in angular order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeScan {
    pub ranges: Vec<f32>,
}

impl RangeScan {
    pub fn new(ranges: Vec<f32>) -> Self {
        Self { ranges }
    }

    /// Get the number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Packed point cloud described by a list of field descriptors.
///
/// Mirrors the body of a ROS `sensor_msgs/PointCloud2` without its header.
/// The record layout is never interpreted by the transforms: records are
/// `point_step` opaque bytes and are only ever copied whole.
#[derive(Clone, Debug, Default)]
pub struct PointCloudBuffer {
    /// Layout of one point record
    pub fields: Vec<PointField>,
    pub is_bigendian: bool,
    /// Size of one point record in bytes
    pub point_step: u32,
    pub row_step: u32,
    pub height: u32,
    pub width: u32,
    pub is_dense: bool,
    /// Raw record bytes, `point_step` bytes per point
    pub data: Vec<u8>,
}

impl PointCloudBuffer {
    /// Build an unorganized cloud (`height == 1`) from packed records.
    ///
    /// Any trailing partial record in `data` is kept in the buffer but is not
    /// counted in `width`.
    pub fn unorganized(fields: Vec<PointField>, point_step: u32, data: Vec<u8>) -> Self {
        let mut cloud = Self {
            fields,
            is_bigendian: false,
            point_step,
            row_step: 0,
            height: 1,
            width: 0,
            is_dense: true,
            data,
        };
        cloud.width = cloud.point_count() as u32;
        cloud.row_step = cloud.width * point_step;
        cloud
    }

    /// Number of complete records in `data`.
    ///
    /// Returns 0 when `point_step` is 0 and ignores trailing partial bytes.
    #[inline]
    pub fn point_count(&self) -> usize {
        match self.point_step as usize {
            0 => 0,
            step => self.data.len() / step,
        }
    }

    /// Raw bytes of record `index`, or `None` past the last complete record.
    #[inline]
    pub fn point(&self, index: usize) -> Option<&[u8]> {
        if index >= self.point_count() {
            return None;
        }
        let step = self.point_step as usize;
        Some(&self.data[index * step..(index + 1) * step])
    }

    /// Check if the cloud holds no complete record
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

/// Common error type for scan transforms and their message adapters.
///
/// The transforms themselves are total; errors only come from parameter
/// validation and from decoding or encoding wire messages.
#[derive(Debug)]
pub enum Error {
    /// Invalid weighting parameters
    Config(String),
    /// CDR encode/decode failure
    Cdr(serde_cdr::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Cdr(err) => write!(f, "cdr error: {:?}", err),
        }
    }
}

impl From<serde_cdr::Error> for Error {
    fn from(err: serde_cdr::Error) -> Self {
        Error::Cdr(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::standard_xyz_intensity_fields;

    #[test]
    fn test_point_count_truncates_partial_record() {
        let cloud = PointCloudBuffer::unorganized(standard_xyz_intensity_fields(), 13, vec![0; 30]);
        assert_eq!(cloud.point_count(), 2);
        assert_eq!(cloud.width, 2);
        assert_eq!(cloud.row_step, 26);
        assert!(cloud.point(1).is_some());
        assert!(cloud.point(2).is_none());
    }

    #[test]
    fn test_zero_point_step() {
        let cloud = PointCloudBuffer::unorganized(Vec::new(), 0, vec![1, 2, 3]);
        assert_eq!(cloud.point_count(), 0);
        assert!(cloud.is_empty());
        assert!(cloud.point(0).is_none());
    }

    #[test]
    fn test_point_slices() {
        let data: Vec<u8> = (0..12).collect();
        let cloud = PointCloudBuffer::unorganized(Vec::new(), 4, data);
        assert_eq!(cloud.point(0), Some(&[0u8, 1, 2, 3][..]));
        assert_eq!(cloud.point(2), Some(&[8u8, 9, 10, 11][..]));
    }

    #[test]
    fn test_error_display() {
        let err = Error::Config("sigma_divisor must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: sigma_divisor must be positive"
        );
    }
}
