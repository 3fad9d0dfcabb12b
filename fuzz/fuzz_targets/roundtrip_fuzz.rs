#![no_main]
use ichingcode::codec::{self, Alphabet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = codec::encode(data);
    assert_eq!(text.chars().count(), codec::encoded_len(data.len()));
    if data.is_empty() {
        assert!(text.is_empty());
        return;
    }

    let layout = codec::inspect(Alphabet::iching(), text.as_bytes()).unwrap();
    assert_eq!(layout.decoded_len(), data.len());

    let decoded = codec::decode(&text).unwrap();
    assert_eq!(decoded, data);
});
