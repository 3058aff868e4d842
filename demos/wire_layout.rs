//! Example: Inspecting the Canonical Wire Layout
//!
//! This example encodes a few values and prints their shapes and bytes, then
//! shows how hostile input is rejected.
//!
//! Run with: `RUST_LOG=borsh_codec=trace cargo run --example wire_layout`

#![allow(clippy::uninlined_format_args)]

use borsh_codec::{
    composite, decode, decode_with_config, encode, utils::global_metrics, Classify, CodecConfig,
    F128,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

composite!(Point { x, y });

#[derive(Debug, Default, Clone, PartialEq)]
struct Polygon {
    name: String,
    vertices: Vec<Point>,
    closed: bool,
    area: F128,
}

composite!(Polygon {
    name,
    vertices,
    closed,
    area,
});

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Canonical Wire Layout Demo ===\n");

    let point = Point { x: 10, y: 20 };
    let bytes = encode(&point)?;
    println!("1. POINT  shape={}  fixed_size={:?}", Point::shape(), Point::shape().fixed_size());
    println!("   {:?} -> {:02X?}\n", point, bytes);

    let polygon = Polygon {
        name: "triangle".into(),
        vertices: vec![
            Point { x: 0, y: 0 },
            Point { x: 4, y: 0 },
            Point { x: 0, y: 3 },
        ],
        closed: true,
        area: F128::from(6.0f64),
    };
    let bytes = encode(&polygon)?;
    println!("2. POLYGON  shape={}  min_size={}", Polygon::shape(), Polygon::min_encoded_size());
    println!("   Serialized size: {} bytes", bytes.len());
    println!("   Hex: {:02X?}", bytes);

    let recovered: Polygon = decode(&bytes)?;
    println!(
        "   Roundtrip: {}\n",
        if recovered == polygon {
            "✓ Success"
        } else {
            "✗ Mismatch"
        }
    );

    println!("3. HOSTILE INPUT");
    let truncated = &bytes[..bytes.len() - 1];
    match decode::<Polygon>(truncated) {
        Ok(_) => println!("   Truncated buffer unexpectedly decoded"),
        Err(e) => println!("   Truncated buffer: {}", e),
    }

    let tight = CodecConfig::default_with_overrides(|c| c.max_length = 4);
    match decode_with_config::<Polygon>(&bytes, &tight) {
        Ok(_) => println!("   Long name unexpectedly accepted"),
        Err(e) => println!("   Length limit: {}", e),
    }

    match encode(&vec![1.0f64, f64::NAN]) {
        Ok(_) => println!("   NaN unexpectedly encoded"),
        Err(e) => println!("   NaN: {}", e),
    }

    println!();
    global_metrics().log_metrics();
    let metrics = global_metrics().snapshot();
    println!(
        "Metrics: {} encodes ({} failed), {} decodes ({} failed)",
        metrics.encodes_total, metrics.encode_failures, metrics.decodes_total, metrics.decode_failures
    );

    Ok(())
}
