#![no_main]

use libfuzzer_sys::fuzz_target;
use tally::assert::{record_failure, record_skip, record_success, record_warning};
use tally::{ConsoleReporter, Engine, EngineConfig, GrowthPolicy};

fuzz_target!(|data: &[u8]| {
    let Some((&header, ops)) = data.split_first() else {
        return;
    };
    // Small policies so growth is exercised on short inputs
    let Ok(growth) = GrowthPolicy::new(usize::from(header % 4) + 1, usize::from(header >> 6) + 2) else {
        return;
    };

    let mut reporter = ConsoleReporter::new(Vec::new());
    let Ok(mut engine) = Engine::init(&mut reporter, EngineConfig::new().with_growth(growth)) else {
        return;
    };

    // Each chunk is one test; each byte in it is one assertion
    for (index, chunk) in ops.chunks(8).enumerate() {
        let chunk = chunk.to_vec();
        let body = move || {
            for (line, op) in chunk.iter().enumerate() {
                let line = line as u32;
                match op % 5 {
                    0 => record_success(),
                    1 => record_failure(line, format_args!("op {op}")),
                    2 => record_warning(line, "warn"),
                    3 => record_skip(),
                    _ => {}
                }
            }
        };
        if engine.register(body, format!("t{index}"), None, index as u32, "fuzz.rs").is_err() {
            return;
        }
    }

    let expected = engine.registered();
    if let Ok(summary) = engine.run() {
        assert_eq!(summary.total, expected);
        assert_eq!(summary.passed + summary.failed, summary.total);
    }
});
