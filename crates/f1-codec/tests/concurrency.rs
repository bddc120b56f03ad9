//! The shared codec decodes from many threads without coordination.

mod helpers;

use std::sync::Arc;
use std::thread;

use helpers::{TestResult, codec, patterned_packet};
use openracing_f1_codec::{Generation, PacketKind};

#[test]
fn parallel_resolve_matches_sequential() -> TestResult {
    let codec = codec()?;
    let packets: Vec<Vec<u8>> = PacketKind::ALL
        .iter()
        .filter(|k| **k != PacketKind::Event)
        .filter_map(|k| patterned_packet(Generation::F2024, *k, k.id()))
        .collect();
    let packets = Arc::new(packets);
    let expected: Vec<Vec<u8>> = packets
        .iter()
        .map(|raw| codec.resolve(raw).and_then(|p| p.to_bytes(codec)))
        .collect::<Result<_, _>>()?;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let packets = Arc::clone(&packets);
            thread::spawn(move || -> Result<Vec<Vec<u8>>, String> {
                let codec = helpers::codec().map_err(|e| e.to_string())?;
                let mut out = Vec::with_capacity(packets.len());
                for _ in 0..50 {
                    out.clear();
                    for raw in packets.iter() {
                        let packet = codec.resolve(raw).map_err(|e| e.to_string())?;
                        out.push(packet.to_bytes(codec).map_err(|e| e.to_string())?);
                    }
                }
                Ok(out)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().map_err(|_| "decoder thread panicked")??;
        assert_eq!(result, expected);
    }
    Ok(())
}

#[test]
fn standard_codec_initialises_once_across_threads() -> TestResult {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| helpers::codec().map(|c| c as *const _ as usize)))
        .collect();
    let mut addresses = Vec::new();
    for handle in handles {
        addresses.push(handle.join().map_err(|_| "thread panicked")??);
    }
    addresses.dedup();
    assert_eq!(addresses.len(), 1);
    Ok(())
}
