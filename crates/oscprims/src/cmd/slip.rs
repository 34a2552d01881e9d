use std::fs;
use std::io::Read;

use oscprims_slip::{SlipConfig, SlipWriter};
use tracing::debug;

use crate::cmd::SlipArgs;
use crate::exit::{io_error, slip_error, CliResult, SUCCESS};
use crate::output::{print_encoded, Encoded, OutputFormat};

pub fn run(args: SlipArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = match &args.file {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            buf
        }
    };

    let config = SlipConfig {
        double_ended: !args.single_ended,
    };
    let framed = frame(&payload, config)?;
    debug!(
        payload = payload.len(),
        framed = framed.len(),
        double_ended = config.double_ended,
        "slip frame"
    );

    print_encoded(
        &Encoded {
            kind: "slip",
            framing: "slip",
            size: framed.len(),
            bytes: &framed,
        },
        format,
    )?;
    Ok(SUCCESS)
}

fn frame(payload: &[u8], config: SlipConfig) -> CliResult<Vec<u8>> {
    write_frame(payload, config).map_err(|err| slip_error("slip framing failed", err))
}

fn write_frame(payload: &[u8], config: SlipConfig) -> oscprims_slip::Result<Vec<u8>> {
    let mut slip = SlipWriter::with_config(Vec::with_capacity(payload.len() + 2), config);
    slip.begin_frame()?;
    slip.write_escaped(payload)?;
    slip.end_frame()?;
    slip.close()
}
