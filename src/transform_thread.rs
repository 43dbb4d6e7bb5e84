// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use edgefirst_foveate::{
    PointCloudResampler, RangeWeighter,
    messages::{LASER_SCAN_SCHEMA, POINT_CLOUD2_SCHEMA, resample_point_cloud, weight_laser_scan},
};
use kanal::AsyncReceiver;
use rand::Rng;
use tracing::{error, trace, warn};
use zenoh::bytes::{Encoding, ZBytes};

// If the receiver is empty, waits for the next message, otherwise returns the
// most recent message on this receiver. If the receiver is closed, returns None
async fn drain_recv<T>(rx: &AsyncReceiver<T>) -> Option<T> {
    let mut msg = match rx.try_recv() {
        Err(_) => return None,
        Ok(Some(v)) => v,
        Ok(None) => return rx.recv().await.ok(),
    };
    while let Ok(Some(v)) = rx.try_recv() {
        trace!("dropping stale scan");
        msg = v;
    }
    Some(msg)
}

pub async fn range_thread(
    rx: AsyncReceiver<Vec<u8>>,
    publ: zenoh::pubsub::Publisher<'_>,
    weighter: RangeWeighter,
) {
    while let Some(payload) = drain_recv(&rx).await {
        let msg = match weight_laser_scan(&weighter, &payload) {
            Ok(v) => v,
            Err(e) => {
                warn!("Could not transform LaserScan: {}", e);
                continue;
            }
        };

        let enc = Encoding::APPLICATION_CDR.with_schema(LASER_SCAN_SCHEMA);
        match publ.put(ZBytes::from(msg)).encoding(enc).await {
            Ok(_) => trace!("{} message sent", publ.key_expr()),
            Err(e) => error!("{} publish error: {:?}", publ.key_expr(), e),
        }
    }
}

pub async fn points_thread<R: Rng>(
    rx: AsyncReceiver<Vec<u8>>,
    publ: zenoh::pubsub::Publisher<'_>,
    resampler: PointCloudResampler,
    mut rng: R,
) {
    while let Some(payload) = drain_recv(&rx).await {
        let msg = match resample_point_cloud(&resampler, &payload, &mut rng) {
            Ok(v) => v,
            Err(e) => {
                warn!("Could not transform PointCloud2: {}", e);
                continue;
            }
        };

        let enc = Encoding::APPLICATION_CDR.with_schema(POINT_CLOUD2_SCHEMA);
        match publ.put(ZBytes::from(msg)).encoding(enc).await {
            Ok(_) => trace!("{} message sent", publ.key_expr()),
            Err(e) => error!("{} publish error: {:?}", publ.key_expr(), e),
        }
    }
}
