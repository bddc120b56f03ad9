//! `f1tel replay`: decode a capture file.

use anyhow::{Context, Result};
use openracing_f1_codec::Codec;
use openracing_f1_listener::{StatsHandler, replay, replay_into};
use serde_json::json;

use crate::commands::ReplayArgs;
use crate::output::packet_json;

pub async fn execute(args: &ReplayArgs, json: bool) -> Result<()> {
    let codec = Codec::standard()?;
    let context = || format!("failed to replay capture file '{}'", args.file.display());

    if json {
        for result in replay(&args.file, codec).with_context(context)? {
            let line = match result {
                Ok(packet) => packet_json(&packet),
                Err(err) => json!({ "error": err.to_string(), "error_kind": err.kind() }),
            };
            println!("{line}");
        }
    } else {
        let mut stats = StatsHandler::new();
        replay_into(&args.file, codec, &mut stats)
            .await
            .with_context(context)?;
        println!("{stats}");
    }
    Ok(())
}
