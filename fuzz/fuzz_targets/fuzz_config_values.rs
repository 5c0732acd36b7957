#![no_main]

use libfuzzer_sys::fuzz_target;

use sortbench_lib::config::{parse_duration, parse_list};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Should not panic on any input
    let _ = parse_duration(text);
    if let Ok(sizes) = parse_list::<u64>(text) {
        assert!(sizes.len() <= text.split(',').count());
    }
});
