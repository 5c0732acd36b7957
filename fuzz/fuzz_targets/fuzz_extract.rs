#![no_main]

use libfuzzer_sys::fuzz_target;

use sortbench_core::{extract_elapsed_seconds, extract_verdict};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Should not panic, and any value found must be usable as a table cell
    if let Some(seconds) = extract_elapsed_seconds(&text) {
        assert!(seconds.is_finite());
        assert!(seconds >= 0.0);
    }
    let _ = extract_verdict(&text);
});
