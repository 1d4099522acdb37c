#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(req) = berth::domain::entities::Requirement::parse(raw) {
            // A parsed name is already normalized
            let again = berth::domain::value_objects::PackageName::new(req.name().as_str());
            assert_eq!(again.as_ref(), Ok(req.name()));
        }
    }
});
