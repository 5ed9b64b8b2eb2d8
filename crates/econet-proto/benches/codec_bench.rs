//! Criterion benchmarks for the dashboard JSON codec.
//!
//! The simulator encodes one `stats_stream` per connection per second and the
//! device does the same on a small MCU, so the hot path is the stats push.
//!
//! Run with:
//! ```bash
//! cargo bench --package econet-proto --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use econet_proto::protocol::settings::{AunStation, EconetSettings, EconetStation};
use econet_proto::{
    decode_request, decode_server_message, encode_message, BridgeStats, LinkStats, Request,
    ServerMessage, StatsStream,
};

// ── Message fixtures ──────────────────────────────────────────────────────────

fn make_stats_stream() -> ServerMessage {
    let bridge = BridgeStats {
        tx_count: 1_204_331,
        tx_retry_count: 812,
        rx_data_count: 990_114,
        rx_ack_count: 989_870,
        ..BridgeStats::default()
    };
    let link = LinkStats {
        rx_frame_count: 4_882_100,
        tx_frame_count: 4_610_004,
        tx_ack_count: 2_300_017,
        ..LinkStats::default()
    };
    ServerMessage::StatsStream(StatsStream::full(bridge, link))
}

fn make_save_econet() -> Request {
    Request::SaveEconet {
        id: 77,
        settings: EconetSettings {
            econet_stations: Some(
                (1..=32)
                    .map(|n| EconetStation {
                        station_id: n,
                        udp_port: 32768 + u16::from(n),
                    })
                    .collect(),
            ),
            aun_stations: Some(vec![AunStation {
                station_id: 254,
                remote_ip: "10.222.8.8".to_string(),
                udp_port: 32768,
            }]),
        },
    }
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let stats = make_stats_stream();
    group.bench_function("stats_stream", |b| {
        b.iter(|| encode_message(black_box(&stats)).unwrap())
    });

    let save = make_save_econet();
    group.bench_function("save_econet_32_stations", |b| {
        b.iter(|| encode_message(black_box(&save)).unwrap())
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let stats_text = encode_message(&make_stats_stream()).unwrap();
    group.bench_function("stats_stream", |b| {
        b.iter(|| decode_server_message(black_box(&stats_text)).unwrap())
    });

    let save_text = encode_message(&make_save_econet()).unwrap();
    group.bench_function("save_econet_32_stations", |b| {
        b.iter(|| decode_request(black_box(&save_text)).unwrap())
    });

    group.bench_function("get_wifi", |b| {
        b.iter(|| decode_request(black_box(r#"{"type":"get_wifi","id":1}"#)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
