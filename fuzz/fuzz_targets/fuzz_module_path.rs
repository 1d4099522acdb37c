#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(module) = berth::domain::value_objects::ModulePath::new(raw) {
            let _ = module.candidate_files();
        }
    }
});
