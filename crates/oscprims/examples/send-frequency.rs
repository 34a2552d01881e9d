//! Send oscillator frequency changes to an OSC 1.1 server over TCP.
//!
//! Run with:
//!   cargo run --example send-frequency -- 127.0.0.1:9000
//!
//! To watch the raw stream, listen first with e.g. `nc -l 9000 | xxd`.

use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use oscprims::{message, PacketWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9000".to_string());

    let stream = TcpStream::connect(&addr)?;
    eprintln!("Connected to {addr}");

    // SLIP framing and a flush after every packet are the defaults.
    let mut writer = PacketWriter::new(stream);
    for frequency in [220.0f32, 330.0, 440.0, 660.0, 880.0] {
        let msg = message("/oscillator/4/frequency").arg(frequency).build();
        writer.send_message(&msg)?;
        eprintln!("Sent {frequency} Hz");
        thread::sleep(Duration::from_millis(250));
    }

    writer.close()?;
    Ok(())
}
