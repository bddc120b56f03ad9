//! Fuzzes full packet resolution and re-encoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_resolve
#![no_main]
use libfuzzer_sys::fuzz_target;
use openracing_f1_codec::Codec;

fuzz_target!(|data: &[u8]| {
    let Ok(codec) = Codec::standard() else {
        return;
    };
    // Errors are expected; a decoded packet must re-encode to its own prefix.
    if let Ok(packet) = codec.resolve(data)
        && let Ok(bytes) = packet.to_bytes(codec)
    {
        assert_eq!(Some(bytes.as_slice()), data.get(..bytes.len()));
    }
});
