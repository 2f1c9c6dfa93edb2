use std::time::Duration;

use divan::{
    black_box,
    Bencher,
};

use crate::{
    field,
    Reader,
    Tag,
    Writer,
};

/// The max time for any benchmark.
const MAX_TIME: Duration = Duration::from_secs(20);

const ELEMENTS: usize = 10_000;

fn premiums() -> Vec<i32> {
    (0..ELEMENTS)
        .map(|i| {
            let magnitude = i32::try_from(i).unwrap().wrapping_mul(7_919);
            if i % 2 == 0 {
                magnitude
            } else {
                -magnitude
            }
        })
        .collect()
}

fn encoded_packed(values: &[i32]) -> Vec<u8> {
    let mut writer = Writer::new();
    field::sint32::encode_repeated(2, values, &mut writer).unwrap();
    writer.finish().unwrap().to_vec()
}

#[divan::bench(max_time = MAX_TIME)]
fn write_varints(bencher: Bencher) {
    bencher.bench(|| {
        let mut writer = Writer::with_capacity(ELEMENTS * 10);
        for i in 0..ELEMENTS as u64 {
            writer.write_varint(black_box(i << 32));
        }
        writer.finish().unwrap()
    });
}

#[divan::bench(max_time = MAX_TIME)]
fn encode_packed_sint32(bencher: Bencher) {
    let values = premiums();
    bencher.bench(|| encoded_packed(black_box(&values)));
}

#[divan::bench(max_time = MAX_TIME)]
fn decode_packed_sint32(bencher: Bencher) {
    let buf = encoded_packed(&premiums());
    bencher.bench(|| {
        let mut reader = Reader::new(black_box(&buf));
        let mut values = Vec::with_capacity(ELEMENTS);
        let tag: Tag = reader.read_tag().unwrap();
        field::sint32::merge_repeated(tag, &mut values, &mut reader).unwrap();
        values
    });
}
