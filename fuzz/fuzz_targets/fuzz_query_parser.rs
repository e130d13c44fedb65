#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing is total: arbitrary input must never panic
    let query = ocrfind::query::parse_query(data);
    let _ = query.root.terms();
});
