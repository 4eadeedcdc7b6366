//! Performance benchmarks for the hot paths of the sync engine.

use server::tracker;
use shared::board::{Board, WallWeights};
use shared::store::ItemRecord;
use shared::word::TargetWord;
use shared::KEY_POSITION_PREFIX;
use std::time::Instant;

fn full_board() -> Board {
    let word = TargetWord::new("ZABBIX");
    let mut rng = rand::thread_rng();
    Board::generate(40, &WallWeights::default(), &word, &mut rng).unwrap()
}

/// Benchmarks flat encoding, which runs once per map publish tick.
#[test]
fn benchmark_flat_encoding() {
    let board = full_board();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = board.encode();
    }

    let duration = start.elapsed();
    println!(
        "Flat encoding: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // A 40x40 encode has to be far cheaper than the 250ms publish cadence.
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks decoding, which runs on every client redraw.
#[test]
fn benchmark_decoding() {
    let flat = full_board().encode();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = Board::decode(&flat, 40).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Decoding: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks overlay rebuilds with a large player roster, the 100ms
/// tracker tick's whole workload.
#[test]
fn benchmark_overlay_rebuild() {
    let reference = full_board();
    let records: Vec<ItemRecord> = (0..100)
        .map(|i| ItemRecord {
            host: format!("Player {i}"),
            key: format!("{KEY_POSITION_PREFIX}token-{i}"),
            value: format!("{} {}", i % 40, (i * 7) % 40),
        })
        .collect();

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = tracker::build_overlay(&reference, &records);
    }

    let duration = start.elapsed();
    println!(
        "Overlay rebuild: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}
