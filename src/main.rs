// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;
mod transform_thread;

use args::Args;
use clap::Parser as _;
use kanal::AsyncSender;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, trace};
use transform_thread::{points_thread, range_thread};
use zenoh::{
    handlers::FifoChannelHandler,
    pubsub::Subscriber,
    qos::{CongestionControl, Priority},
    sample::Sample,
};

/// Pending scans per stream.  Workers always drain to the newest scan so a
/// small queue is enough to absorb bursts.
const QUEUE_DEPTH: usize = 4;

// Forwards raw payloads from a subscriber into the worker channel.  Scans are
// dropped when the worker is behind; returns when either side closes.
async fn forward(subscriber: Subscriber<FifoChannelHandler<Sample>>, tx: AsyncSender<Vec<u8>>) {
    while let Ok(sample) = subscriber.recv_async().await {
        let payload = sample.payload().to_bytes().into_owned();
        match tx.try_send(payload) {
            Ok(true) => {}
            Ok(false) => trace!("{} queue full, dropping scan", subscriber.key_expr()),
            Err(_) => return,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.rust_log)
        .init();

    let weighter = args.weighter()?;
    let resampler = args.resampler()?;
    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let session = zenoh::open(zenoh::config::Config::try_from(&args)?).await?;
    debug!("opened zenoh session");

    let scan_sub = session.declare_subscriber(args.scan_topic.clone()).await?;
    let points_sub = session.declare_subscriber(args.points_topic.clone()).await?;

    let scan_publ = match session
        .declare_publisher(args.output_scan_topic.clone())
        .priority(Priority::DataHigh)
        .congestion_control(CongestionControl::Drop)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            error!(
                "Failed to create publisher {}: {:?}",
                args.output_scan_topic, e
            );
            return Err(e);
        }
    };

    let points_publ = match session
        .declare_publisher(args.output_points_topic.clone())
        .priority(Priority::DataHigh)
        .congestion_control(CongestionControl::Drop)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            error!(
                "Failed to create publisher {}: {:?}",
                args.output_points_topic, e
            );
            return Err(e);
        }
    };

    info!(
        "non-uniform density transform configured: {} -> {} (sigma divisor {}), {} -> {} (fov {:?}, half width {})",
        args.scan_topic,
        args.output_scan_topic,
        weighter.sigma_divisor(),
        args.points_topic,
        args.output_points_topic,
        resampler.fov(),
        resampler.half_width(),
    );

    let (scan_tx, scan_rx) = kanal::bounded_async(QUEUE_DEPTH);
    let (points_tx, points_rx) = kanal::bounded_async(QUEUE_DEPTH);

    tokio::join!(
        forward(scan_sub, scan_tx),
        range_thread(scan_rx, scan_publ, weighter),
        forward(points_sub, points_tx),
        points_thread(points_rx, points_publ, resampler, rng),
    );

    info!("subscriptions closed, exiting");
    Ok(())
}
