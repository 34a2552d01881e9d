use std::fs;
use std::time::{Duration, UNIX_EPOCH};

use bytes::Bytes;
use oscprims_codec::{Atomic, Bundle, FramingMode, Message, OscObject, Packet, TimeTag};
use serde::Deserialize;
use tracing::debug;

use crate::cmd::{EncodeArgs, Framing};
use crate::exit::{encode_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_encoded, Encoded, OutputFormat};

/// A message or bundle described in JSON.
///
/// ```json
/// {"time": "immediate", "elements": [
///     {"address": "/mixer/fader/1", "args": ["f:0.75"]},
///     {"address": "/mixer/mute/2", "args": ["T"]}
/// ]}
/// ```
///
/// Arguments use the same typed syntax as the command line.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tree {
    Message {
        address: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Bundle {
        #[serde(default)]
        time: Option<String>,
        elements: Vec<Tree>,
    },
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let root = resolve_root(&args)?;
    let kind = match root {
        OscObject::Message(_) => "message",
        OscObject::Bundle(_) => "bundle",
    };

    let bytes = encode(&root, args.framing)?;
    debug!(kind, framing = args.framing.label(), size = bytes.len(), "encoded packet");

    print_encoded(
        &Encoded {
            kind,
            framing: args.framing.label(),
            size: bytes.len(),
            bytes: &bytes,
        },
        format,
    )?;
    Ok(SUCCESS)
}

fn resolve_root(args: &EncodeArgs) -> CliResult<OscObject> {
    if let Some(json) = &args.json {
        return parse_tree(json, "--json");
    }
    if let Some(path) = &args.file {
        let json = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return parse_tree(&json, &path.display().to_string());
    }

    let address = args
        .address
        .clone()
        .ok_or_else(|| CliError::new(USAGE, "an address, --json or --file is required"))?;
    Ok(build_message(address, &args.args)?.into())
}

fn encode(root: &OscObject, framing: Framing) -> CliResult<Bytes> {
    let mode = match framing {
        Framing::None => {
            return root
                .encode()
                .map_err(|err| io_error("encode failed", err));
        }
        Framing::Length => FramingMode::LengthPrefixed,
        Framing::Slip => FramingMode::Slip,
    };
    Packet::new(root.clone(), mode)
        .to_bytes()
        .map_err(|err| encode_error("encode failed", err))
}

fn parse_tree(json: &str, source: &str) -> CliResult<OscObject> {
    let tree: Tree = serde_json::from_str(json).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!("{source} is not a message or bundle tree: {err}"),
        )
    })?;
    tree_to_object(tree)
}

fn tree_to_object(tree: Tree) -> CliResult<OscObject> {
    match tree {
        Tree::Message { address, args } => Ok(build_message(address, &args)?.into()),
        Tree::Bundle { time, elements } => {
            let time_tag = match time {
                Some(text) => parse_time_tag(&text)?,
                None => TimeTag::Immediate,
            };
            let objects = elements
                .into_iter()
                .map(tree_to_object)
                .collect::<CliResult<Vec<_>>>()?;
            Ok(Bundle::from_objects(time_tag, objects).into())
        }
    }
}

fn build_message(address: String, args: &[String]) -> CliResult<Message> {
    let args = args
        .iter()
        .map(|arg| parse_atomic(arg))
        .collect::<CliResult<Vec<_>>>()?;
    Ok(Message::new(address, args))
}

/// Parse one typed argument such as `i:42` or `T`.
fn parse_atomic(arg: &str) -> CliResult<Atomic> {
    match arg {
        "T" => return Ok(Atomic::True),
        "F" => return Ok(Atomic::False),
        "N" => return Ok(Atomic::Nil),
        "I" => return Ok(Atomic::Impulse),
        _ => {}
    }

    let (tag, value) = arg.split_once(':').ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("argument {arg:?} must be T, F, N, I or <tag>:<value>"),
        )
    })?;
    let invalid = |what: &str| CliError::new(USAGE, format!("invalid {what} argument: {arg:?}"));

    match tag {
        "i" => value.parse().map(Atomic::Int32).map_err(|_| invalid("int32")),
        "f" => value
            .parse()
            .map(Atomic::Float32)
            .map_err(|_| invalid("float32")),
        "s" => Ok(Atomic::String(value.to_string())),
        "b" => hex::decode(value)
            .map(Atomic::from)
            .map_err(|_| invalid("blob")),
        "t" => parse_time_tag(value).map(Atomic::TimeTag),
        other => Err(CliError::new(
            USAGE,
            format!("unknown argument type tag {other:?} in {arg:?}"),
        )),
    }
}

/// `now`, `immediate`, or Unix seconds with an optional decimal fraction.
fn parse_time_tag(text: &str) -> CliResult<TimeTag> {
    match text {
        "now" => return Ok(TimeTag::now()),
        "immediate" => return Ok(TimeTag::Immediate),
        _ => {}
    }

    let invalid = || CliError::new(USAGE, format!("invalid time tag: {text:?}"));
    let (secs, fraction) = text.split_once('.').unwrap_or((text, ""));
    let secs: u64 = secs.parse().map_err(|_| invalid())?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // right-pad to nanoseconds, dropping digits beyond 1ns
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let nanos: u32 = digits.parse().map_err(|_| invalid())?;

    let instant = UNIX_EPOCH
        .checked_add(Duration::new(secs, nanos))
        .ok_or_else(invalid)?;
    Ok(TimeTag::at(instant))
}
