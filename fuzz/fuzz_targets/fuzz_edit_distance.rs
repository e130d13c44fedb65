#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, u8)| {
    let (a, b, k) = input;
    let k = usize::from(k % 8);

    // The bounded variant must agree with the full table
    let full = ocrfind::utils::edit_distance(a, b);
    let bounded = ocrfind::utils::bounded_edit_distance(a, b, k);
    assert_eq!(bounded, (full <= k).then_some(full));
    let _ = ocrfind::query::match_token(a, b);
});
