//! # Gossip-Chat Benchmarks
//!
//! | Path | Cost driver |
//! |------|-------------|
//! | wire encode/decode | base64 of the text |
//! | dissemination tick | peers × live history sends |
//! | dedup merge | history map lookups |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use gc_02_room_gossip::test_utils::RecordingTransport;
use gc_02_room_gossip::service::disseminate;
use gc_02_room_gossip::{wire, Room};
use shared_types::{Author, ChatMessage, PeerAddress, Timestamp, TopicHash};

const NOW: u32 = 1_700_000_000;

fn message(topic: TopicHash, id: u32, len: usize) -> ChatMessage {
    ChatMessage::new(
        topic,
        id,
        Author::new("deviceA").unwrap(),
        Timestamp::new(NOW),
        "x".repeat(len),
    )
}

fn bench_wire_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-02-wire");
    let topic = TopicHash::from_room_name("chatik");

    for len in [16, 256, 1_000] {
        let msg = message(topic, 1, len);
        let datagram = wire::encode(&msg);
        group.throughput(Throughput::Bytes(datagram.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", len), &msg, |b, msg| {
            b.iter(|| black_box(wire::encode(msg)))
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &datagram, |b, data| {
            b.iter(|| black_box(wire::decode(data).is_ok()))
        });
    }

    group.finish();
}

fn bench_dissemination_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("gc-02-dissemination");
    group.measurement_time(Duration::from_secs(5));

    for (peers, history) in [(4, 16), (16, 64), (32, 256)] {
        let room = Room::new("chatik");
        for n in 0..peers {
            let peer: PeerAddress = format!("10.0.{}.{}:3301", n / 250, n % 250 + 1)
                .parse()
                .unwrap();
            room.add_peer(peer);
        }
        for id in 1..=history {
            room.merge(message(room.topic(), id, 64));
        }

        group.throughput(Throughput::Elements((peers * history) as u64));
        group.bench_function(BenchmarkId::new("tick", format!("{peers}x{history}")), |b| {
            b.iter(|| {
                let transport = RecordingTransport::new();
                black_box(disseminate(&room, &transport, Timestamp::new(NOW), 86_400))
            })
        });
    }

    group.finish();
}

fn bench_dedup_merge(c: &mut Criterion) {
    let topic = TopicHash::from_room_name("chatik");
    let room = Room::new("chatik");
    let known: Vec<ChatMessage> = (1..=1_000).map(|id| message(topic, id, 32)).collect();
    for msg in &known {
        room.merge(msg.clone());
    }

    c.bench_function("gc-02-merge-duplicate", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % known.len();
            black_box(room.merge(known[i].clone()))
        })
    });
}

criterion_group!(
    benches,
    bench_wire_codec,
    bench_dissemination_tick,
    bench_dedup_merge
);
criterion_main!(benches);
