// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Packed point record helpers for PointCloud2 buffers.
//!
//! The transforms treat records as opaque bytes. These helpers build and
//! inspect records in the common 13-byte layout so that synthetic clouds can
//! be produced for tests and benchmarks and retained records can be decoded
//! again.
//!
//! ## 13-byte format (xyz + intensity)
//! ```text
//! ┌───────┬───────┬───────┬───────────┐
//! │ x:f32 │ y:f32 │ z:f32 │ intensity │
//! │ 4B    │ 4B    │ 4B    │ 1B        │
//! └───────┴───────┴───────┴───────────┘
//! ```

use crate::lidar::PointCloudBuffer;
use edgefirst_schemas::sensor_msgs::PointField;

/// Point field data types for PointCloud2 messages.
///
/// These values correspond to the ROS sensor_msgs/PointField datatype field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PointFieldType {
    INT8 = 1,
    UINT8 = 2,
    INT16 = 3,
    UINT16 = 4,
    INT32 = 5,
    UINT32 = 6,
    FLOAT32 = 7,
    FLOAT64 = 8,
}

impl PointFieldType {
    /// Size in bytes of one element of this type.
    pub fn size(self) -> usize {
        match self {
            PointFieldType::INT8 | PointFieldType::UINT8 => 1,
            PointFieldType::INT16 | PointFieldType::UINT16 => 2,
            PointFieldType::INT32 | PointFieldType::UINT32 | PointFieldType::FLOAT32 => 4,
            PointFieldType::FLOAT64 => 8,
        }
    }
}

impl TryFrom<u8> for PointFieldType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PointFieldType::INT8),
            2 => Ok(PointFieldType::UINT8),
            3 => Ok(PointFieldType::INT16),
            4 => Ok(PointFieldType::UINT16),
            5 => Ok(PointFieldType::INT32),
            6 => Ok(PointFieldType::UINT32),
            7 => Ok(PointFieldType::FLOAT32),
            8 => Ok(PointFieldType::FLOAT64),
            other => Err(other),
        }
    }
}

fn field(name: &str, offset: u32, datatype: PointFieldType) -> PointField {
    PointField {
        name: String::from(name),
        offset,
        datatype: datatype as u8,
        count: 1,
    }
}

/// Build the standard XYZ + intensity point fields (13-byte stride).
///
/// - x: FLOAT32 at offset 0
/// - y: FLOAT32 at offset 4
/// - z: FLOAT32 at offset 8
/// - reflect: UINT8 at offset 12
pub fn standard_xyz_intensity_fields() -> Vec<PointField> {
    vec![
        field("x", 0, PointFieldType::FLOAT32),
        field("y", 4, PointFieldType::FLOAT32),
        field("z", 8, PointFieldType::FLOAT32),
        field("reflect", 12, PointFieldType::UINT8),
    ]
}

/// Record size implied by a field list (end of the furthest field).
pub fn fields_extent(fields: &[PointField]) -> usize {
    fields
        .iter()
        .filter_map(|f| {
            let size = PointFieldType::try_from(f.datatype).ok()?.size();
            Some(f.offset as usize + size * f.count.max(1) as usize)
        })
        .max()
        .unwrap_or(0)
}

/// Pack point data into the 13-byte little-endian format.
///
/// # Arguments
///
/// * `x`, `y`, `z` - Coordinate arrays (must be at least `n_points` long)
/// * `intensity` - Intensity array (must be at least `n_points` long)
/// * `n_points` - Number of points to format
pub fn format_points_13byte(
    x: &[f32],
    y: &[f32],
    z: &[f32],
    intensity: &[u8],
    n_points: usize,
) -> Vec<u8> {
    let mut data = vec![0u8; 13 * n_points];
    for index in 0..n_points {
        let offset = index * 13;
        data[offset..offset + 4].copy_from_slice(&x[index].to_le_bytes());
        data[offset + 4..offset + 8].copy_from_slice(&y[index].to_le_bytes());
        data[offset + 8..offset + 12].copy_from_slice(&z[index].to_le_bytes());
        data[offset + 12] = intensity[index];
    }
    data
}

/// Read the FLOAT32 field `name` from every complete record of `cloud`.
///
/// Honors `is_bigendian`. Returns `None` when the field is missing, is not
/// FLOAT32, or does not fit inside `point_step`.
pub fn read_f32_field(cloud: &PointCloudBuffer, name: &str) -> Option<Vec<f32>> {
    let field = cloud.fields.iter().find(|f| f.name == name)?;
    if field.datatype != PointFieldType::FLOAT32 as u8 {
        return None;
    }
    let offset = field.offset as usize;
    if offset + 4 > cloud.point_step as usize {
        return None;
    }

    let values = (0..cloud.point_count())
        .filter_map(|index| cloud.point(index))
        .map(|record| {
            let bytes = [
                record[offset],
                record[offset + 1],
                record[offset + 2],
                record[offset + 3],
            ];
            match cloud.is_bigendian {
                true => f32::from_be_bytes(bytes),
                false => f32::from_le_bytes(bytes),
            }
        })
        .collect();
    Some(values)
}
