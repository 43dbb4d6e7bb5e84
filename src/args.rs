// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edgefirst_foveate::{
    Error, PointCloudResampler, RangeWeighter,
    range_weight::DEFAULT_SIGMA_DIVISOR,
    resample::{DEFAULT_FOV_MAX, DEFAULT_FOV_MIN, DEFAULT_HALF_WIDTH},
};
use serde_json::json;
use tracing::level_filters::LevelFilter;
use zenoh::config::{Config, WhatAmI};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input LaserScan topic
    #[arg(long, env, default_value = "rt/lidar/scan")]
    pub scan_topic: String,

    /// Input PointCloud2 topic
    #[arg(long, env, default_value = "rt/lidar/scan/points")]
    pub points_topic: String,

    /// Output topic for the reweighted LaserScan
    #[arg(long, env, default_value = "rt/lidar/non_uniform_scan")]
    pub output_scan_topic: String,

    /// Output topic for the subsampled PointCloud2
    #[arg(long, env, default_value = "rt/lidar/non_uniform_scan/points")]
    pub output_points_topic: String,

    /// Range weighting sigma as a fraction of the scan half-length, given as
    /// its divisor.  Larger values concentrate weight at the center.
    #[arg(long, env, default_value_t = DEFAULT_SIGMA_DIVISOR)]
    pub sigma_divisor: f64,

    /// Angle in radians assigned to the first point of a cloud.
    #[arg(long, env, default_value_t = DEFAULT_FOV_MIN, allow_negative_numbers = true)]
    pub fov_min: f64,

    /// Angle in radians assigned one past the last point of a cloud.
    #[arg(long, env, default_value_t = DEFAULT_FOV_MAX, allow_negative_numbers = true)]
    pub fov_max: f64,

    /// Angle in radians at which point acceptance falls to 1/e.
    #[arg(long, env, default_value_t = DEFAULT_HALF_WIDTH)]
    pub half_width: f64,

    /// Seed for point cloud subsampling.  When unset the generator is seeded
    /// from the operating system.
    #[arg(long, env)]
    pub seed: Option<u64>,

    /// Application log level
    #[arg(long, env, default_value = "info")]
    pub rust_log: LevelFilter,

    /// zenoh connection mode
    #[arg(long, env, default_value = "peer")]
    mode: WhatAmI,

    /// connect to zenoh endpoints
    #[arg(long, env)]
    connect: Vec<String>,

    /// listen to zenoh endpoints
    #[arg(long, env)]
    listen: Vec<String>,

    /// disable zenoh multicast scouting
    #[arg(long, env)]
    no_multicast_scouting: bool,
}

impl Args {
    pub fn weighter(&self) -> Result<RangeWeighter, Error> {
        RangeWeighter::new(self.sigma_divisor)
    }

    pub fn resampler(&self) -> Result<PointCloudResampler, Error> {
        PointCloudResampler::new(self.fov_min, self.fov_max, self.half_width)
    }
}

impl TryFrom<&Args> for Config {
    type Error = zenoh::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut config = Config::default();

        config.insert_json5("mode", &json!(args.mode).to_string())?;

        if !args.connect.is_empty() {
            config.insert_json5("connect/endpoints", &json!(args.connect).to_string())?;
        }

        if !args.listen.is_empty() {
            config.insert_json5("listen/endpoints", &json!(args.listen).to_string())?;
        }

        if args.no_multicast_scouting {
            config.insert_json5("scouting/multicast/enabled", &json!(false).to_string())?;
        }

        config.insert_json5("scouting/multicast/interface", &json!("lo").to_string())?;

        Ok(config)
    }
}
