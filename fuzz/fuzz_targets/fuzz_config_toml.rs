#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<berth::Config>(content) {
            let root = Path::new("/project");
            let _ = config.requirements(root);
            let _ = config.tooling(root);
        }
    }
});
