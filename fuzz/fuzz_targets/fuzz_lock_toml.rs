#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Lock parsing must reject bad input with an error, never a panic
        let _ = berth::infrastructure::repositories::parse_lock_descriptor(
            content,
            Path::new("berth.lock"),
        );
    }
});
