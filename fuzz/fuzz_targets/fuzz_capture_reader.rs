//! Fuzzes the capture file reader.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_capture_reader
#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use openracing_f1_listener::{CAPTURE_MAGIC, CaptureReader};

fuzz_target!(|data: &[u8]| {
    let mut bytes = CAPTURE_MAGIC.to_vec();
    bytes.extend_from_slice(data);
    if let Ok(reader) = CaptureReader::new(Cursor::new(bytes)) {
        for packet in reader {
            if packet.is_err() {
                break;
            }
        }
    }
});
