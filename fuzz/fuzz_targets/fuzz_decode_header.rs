//! Fuzzes header decoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_decode_header
#![no_main]
use libfuzzer_sys::fuzz_target;
use openracing_f1_codec::decode_header;

fuzz_target!(|data: &[u8]| {
    if let Ok((header, size)) = decode_header(data) {
        assert_eq!(header.wire_size(), size);
        assert_eq!(Some(header.to_bytes().as_slice()), data.get(..size));
    }
});
