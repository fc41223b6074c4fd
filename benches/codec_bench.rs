//! Benchmarks for the tracker wire codec

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fdfs_tracker::protocol::{
    encode_group_name, pack_header, parse_header, read_frame, write_frame, Charset,
    TrackerCommand,
};
use fdfs_tracker::stat::{decode_records, GroupStat, StatRecord, StorageStat};

fn header_benchmarks(c: &mut Criterion) {
    c.bench_function("pack_header", |b| {
        b.iter(|| pack_header(black_box(102), black_box(33), 0))
    });

    let header = pack_header(100, 39, 0);
    c.bench_function("parse_header", |b| b.iter(|| parse_header(black_box(&header))));
}

fn frame_benchmarks(c: &mut Criterion) {
    let group = encode_group_name(Charset::Latin1, "group1");
    let filename = b"M00/00/00/wKgBZmVxYz6AbcdefAAAAAAAAA.jpg";

    c.bench_function("write_fetch_request", |b| {
        let mut out = Vec::with_capacity(128);
        b.iter(|| {
            out.clear();
            write_frame(&mut out, TrackerCommand::QueryFetchOne, &[&group[..], &filename[..]])
        })
    });

    let mut frame = pack_header(100, 39, 0).to_vec();
    frame.extend_from_slice(&[0u8; 39]);
    c.bench_function("read_fetch_response", |b| {
        b.iter(|| {
            read_frame(
                &mut Cursor::new(black_box(&frame)),
                TrackerCommand::Response,
                Some(39),
            )
        })
    });
}

fn stat_benchmarks(c: &mut Criterion) {
    let groups = vec![0u8; GroupStat::record_size() * 32];
    c.bench_function("decode_32_group_stats", |b| {
        b.iter(|| decode_records::<GroupStat>(black_box(&groups), Charset::Latin1))
    });

    let storages = vec![0u8; StorageStat::record_size() * 32];
    c.bench_function("decode_32_storage_stats", |b| {
        b.iter(|| decode_records::<StorageStat>(black_box(&storages), Charset::Latin1))
    });
}

criterion_group!(benches, header_benchmarks, frame_benchmarks, stat_benchmarks);
criterion_main!(benches);
