#![no_main]
use ichingcode::codec::{self, Alphabet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, only return errors.
    let _ = codec::decode_bytes(Alphabet::iching(), data);

    // Also fuzz the str entry point when the bytes happen to be UTF-8.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = codec::decode(text);
    }
});
