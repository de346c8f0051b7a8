//! Benchmarks for digest and verification throughput.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use std::hint::black_box;
use std::io::Cursor;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use veritar_core::archive::ArchiveReader;
use veritar_core::digest::DigestBuffer;
use veritar_core::digest::digest_reader;
use veritar_core::manifest::ChecksumManifest;
use veritar_core::test_utils::TarTestBuilder;
use veritar_core::test_utils::manifest_text;
use veritar_core::verification::NoopCallback;
use veritar_core::verification::Verifier;

/// Builds an archive of `count` files of `size` bytes and its manifest.
fn build_fixture(count: usize, size: usize) -> (Vec<u8>, String) {
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    let names: Vec<String> = (0..count).map(|i| format!("dir/file_{i:05}.bin")).collect();

    let mut builder = TarTestBuilder::new().add_directory("dir");
    for name in &names {
        builder = builder.add_file(name, &data);
    }
    let entries: Vec<(&str, &[u8])> = names
        .iter()
        .map(|name| (name.as_str(), data.as_slice()))
        .collect();

    (builder.build(), manifest_text(&entries))
}

fn benchmark_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for size in [4 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let data = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            let mut buffer = DigestBuffer::new();
            b.iter(|| {
                let digest = digest_reader(&mut Cursor::new(data.as_slice()), &mut buffer).unwrap();
                black_box(digest);
            });
        });
    }

    group.finish();
}

fn benchmark_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");

    for (count, size) in [(1000, 1024), (100, 100 * 1024), (4, 4 * 1024 * 1024)] {
        let (archive, manifest) = build_fixture(count, size);
        group.throughput(Throughput::Bytes(archive.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("plain", format!("{count}x{size}")),
            &(archive, manifest),
            |b, (archive, manifest)| {
                b.iter(|| {
                    let manifest = ChecksumManifest::from_reader(manifest.as_bytes()).unwrap();
                    let reader = ArchiveReader::from_reader(Cursor::new(archive.clone())).unwrap();
                    let report = Verifier::new(manifest, &mut NoopCallback).run(reader);
                    assert!(report.is_ok());
                    black_box(report);
                });
            },
        );
    }

    let (count, size) = (100, 100 * 1024);
    let (archive, manifest) = build_fixture(count, size);
    let mut builder = TarTestBuilder::new().add_directory("dir");
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    for i in 0..count {
        builder = builder.add_file(&format!("dir/file_{i:05}.bin"), &data);
    }
    let gzip = builder.build_gzip();
    group.throughput(Throughput::Bytes(archive.len() as u64));
    group.bench_function(BenchmarkId::new("gzip", format!("{count}x{size}")), |b| {
        b.iter(|| {
            let manifest = ChecksumManifest::from_reader(manifest.as_bytes()).unwrap();
            let reader = ArchiveReader::from_reader(Cursor::new(gzip.clone())).unwrap();
            black_box(Verifier::new(manifest, &mut NoopCallback).run(reader));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_digest, benchmark_verify);
criterion_main!(benches);
