#![no_main]

use borsh_codec::{composite, decode, decode_exact, encode};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Default, PartialEq)]
struct Envelope {
    kind: u8,
    tags: Vec<String>,
    body: Vec<Vec<u16>>,
    weight: f32,
    flags: [bool; 2],
}

composite!(Envelope {
    kind,
    tags,
    body,
    weight,
    flags,
});

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must never panic, and anything that decodes exactly
    // must re-encode to the same bytes.
    let _ = decode::<Vec<String>>(data);
    let _ = decode::<(u64, bool, String)>(data);

    if let Ok(envelope) = decode_exact::<Envelope>(data) {
        if let Ok(bytes) = encode(&envelope) {
            assert_eq!(bytes, data);
        }
    }
});
