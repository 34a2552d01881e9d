//! Build a nested bundle and dump it in both stream framings.
//!
//! Run with:
//!   cargo run --example nested-bundle

use std::time::{Duration, SystemTime};

use oscprims::{build_bundle, FramingMode, OscObject, Packet, TimeTag};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let later = SystemTime::now() + Duration::from_millis(500);

    let scene = build_bundle(TimeTag::Immediate, |b| {
        b.message("/mixer/fader/1", |m| m.arg(0.75f32));
        b.message("/mixer/label/1", |m| m.arg("vocals"));
        b.bundle(later, |fade| {
            fade.message("/mixer/fader/2", |m| m.arg(0.0f32));
            fade.message("/mixer/mute/2", |m| m.arg(true));
        });
    });
    let root = OscObject::from(scene);

    println!("bundle: {} bytes unframed", root.size());
    for mode in [FramingMode::LengthPrefixed, FramingMode::Slip] {
        let bytes = Packet::new(root.clone(), mode).to_bytes()?;
        println!("{mode:?} ({} bytes):", bytes.len());
        for chunk in bytes.chunks(16) {
            let row: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            println!("  {}", row.join(" "));
        }
    }

    Ok(())
}
