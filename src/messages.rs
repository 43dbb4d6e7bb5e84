// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! ROS2 wire messages and payload-level transforms.
//!
//! Scans arrive and leave as CDR encoded `sensor_msgs/msg/LaserScan` and
//! `sensor_msgs/msg/PointCloud2` payloads. Everything a transform does not
//! touch (header, angles, timing, intensities) is carried through verbatim.

use crate::{
    formats::fields_extent,
    lidar::{Error, PointCloudBuffer},
    range_weight::RangeWeighter,
    resample::PointCloudResampler,
};
use edgefirst_schemas::{sensor_msgs::PointCloud2, serde_cdr, std_msgs::Header};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Schema name attached to published LaserScan payloads.
pub const LASER_SCAN_SCHEMA: &str = "sensor_msgs/msg/LaserScan";

/// Schema name attached to published PointCloud2 payloads.
pub const POINT_CLOUD2_SCHEMA: &str = "sensor_msgs/msg/PointCloud2";

/// `sensor_msgs/msg/LaserScan`
#[derive(Debug, Serialize, Deserialize)]
pub struct LaserScan {
    pub header: Header,
    /// Start angle of the scan (radians)
    pub angle_min: f32,
    /// End angle of the scan (radians)
    pub angle_max: f32,
    /// Angular distance between measurements (radians)
    pub angle_increment: f32,
    /// Time between measurements (seconds)
    pub time_increment: f32,
    /// Time between scans (seconds)
    pub scan_time: f32,
    pub range_min: f32,
    pub range_max: f32,
    pub ranges: Vec<f32>,
    pub intensities: Vec<f32>,
}

impl PointCloudBuffer {
    /// Split a PointCloud2 message into its header and cloud body.
    pub fn from_message(msg: PointCloud2) -> (Header, Self) {
        let cloud = Self {
            fields: msg.fields,
            is_bigendian: msg.is_bigendian,
            point_step: msg.point_step,
            row_step: msg.row_step,
            height: msg.height,
            width: msg.width,
            is_dense: msg.is_dense,
            data: msg.data,
        };
        (msg.header, cloud)
    }

    /// Reattach a header and build the PointCloud2 message.
    pub fn into_message(self, header: Header) -> PointCloud2 {
        PointCloud2 {
            header,
            height: self.height,
            width: self.width,
            fields: self.fields,
            is_bigendian: self.is_bigendian,
            point_step: self.point_step,
            row_step: self.row_step,
            data: self.data,
            is_dense: self.is_dense,
        }
    }
}

/// Decode a LaserScan payload, reweight its ranges and re-encode it.
#[instrument(skip_all)]
pub fn weight_laser_scan(weighter: &RangeWeighter, payload: &[u8]) -> Result<Vec<u8>, Error> {
    let mut scan: LaserScan = serde_cdr::deserialize(payload)?;
    weighter.weight_in_place(&mut scan.ranges);
    Ok(serde_cdr::serialize(&scan)?)
}

/// Decode a PointCloud2 payload, subsample it and re-encode it.
#[instrument(skip_all)]
pub fn resample_point_cloud<R: Rng>(
    resampler: &PointCloudResampler,
    payload: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, Error> {
    let msg: PointCloud2 = serde_cdr::deserialize(payload)?;
    let (header, cloud) = PointCloudBuffer::from_message(msg);

    let extent = fields_extent(&cloud.fields);
    if (cloud.point_step as usize) < extent {
        warn!(
            "point_step {} is smaller than the declared field extent {}",
            cloud.point_step, extent
        );
    }

    let resampled = resampler.resample_with(&cloud, rng);
    Ok(serde_cdr::serialize(&resampled.into_message(header))?)
}
