//! `f1tel decode`: decode one raw datagram file.

use anyhow::{Context, Result};
use openracing_f1_codec::Codec;

use crate::commands::DecodeArgs;
use crate::error::CliError;
use crate::output::{packet_json, packet_line};

pub fn execute(args: &DecodeArgs, json: bool) -> Result<()> {
    let raw = std::fs::read(&args.file)
        .with_context(|| format!("failed to read datagram file '{}'", args.file.display()))?;
    let packet = Codec::standard()?.resolve(&raw).map_err(CliError::Decode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&packet_json(&packet))?);
    } else {
        println!("{}", packet_line(&packet));
        println!("{}", serde_json::to_string_pretty(&packet.to_structured())?);
    }
    Ok(())
}
