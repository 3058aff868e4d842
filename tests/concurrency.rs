use borsh_codec::{composite, decode, encode, utils::global_metrics};
use std::thread;

#[derive(Debug, Default, Clone, PartialEq)]
struct Sample {
    index: u64,
    payload: Vec<u8>,
    label: String,
}

composite!(Sample {
    index,
    payload,
    label,
});

#[test]
fn concurrent_encode_decode_heavy() {
    let iterations = 5_000usize;
    let payload_sizes = [0usize, 64, 512, 4096];
    let before = global_metrics().snapshot();

    let handles: Vec<_> = payload_sizes
        .iter()
        .map(|&size| {
            thread::spawn(move || {
                for i in 0..iterations {
                    let sample = Sample {
                        index: i as u64,
                        payload: vec![((i + size) & 0xFF) as u8; size],
                        label: format!("worker-{size}"),
                    };
                    let bytes = encode(&sample).unwrap();
                    let decoded: Sample = decode(&bytes).unwrap();
                    assert_eq!(decoded, sample);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let after = global_metrics().snapshot();
    let calls = (iterations * payload_sizes.len()) as u64;
    assert!(after.encodes_total - before.encodes_total >= calls);
    assert!(after.decodes_total - before.decodes_total >= calls);
    assert_eq!(after.encode_failures, before.encode_failures);
}
