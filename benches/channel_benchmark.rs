/*!
 * Channel and Bridge Benchmarks
 *
 * Fake pipe throughput and bridge round-trip latency
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plugin_bridge::bridge::{envelope, FramedTransport};
use plugin_bridge::{BoundedByteChannel, Dispatcher, EventLoop, SyncCallBridge};
use std::sync::Arc;
use std::thread;

fn bench_pipe_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipe_throughput");
    const TOTAL: usize = 1024 * 1024;

    for chunk in [64usize, 4096, 65536] {
        group.throughput(Throughput::Bytes(TOTAL as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let channel = Arc::new(BoundedByteChannel::new(64 * 1024).unwrap());
                let writer = {
                    let channel = Arc::clone(&channel);
                    thread::spawn(move || {
                        let data = vec![0xA5u8; chunk];
                        let mut sent = 0;
                        while sent < TOTAL {
                            sent += channel.write(&data[..chunk.min(TOTAL - sent)]).unwrap();
                        }
                    })
                };

                let mut buf = vec![0u8; chunk];
                let mut received = 0;
                while received < TOTAL {
                    let want = chunk.min(TOTAL - received);
                    received += channel.read(&mut buf[..want]).unwrap();
                }
                writer.join().unwrap();
                black_box(received);
            });
        });
    }

    group.finish();
}

fn bench_bridge_round_trip(c: &mut Criterion) {
    let event_loop = EventLoop::spawn("designated-bench").unwrap();
    let dispatcher = event_loop.handle();
    let (to_host, host_inbox) = flume::unbounded::<String>();

    let bridge = SyncCallBridge::new(
        dispatcher.clone(),
        FramedTransport::new(move |message| {
            let _ = to_host.send(message);
        }),
    );

    let host_bridge = bridge.clone();
    thread::spawn(move || {
        for message in host_inbox.iter() {
            if let Ok((id, request)) = envelope::decode(&message) {
                let reply = request.to_string();
                let bridge = host_bridge.clone();
                dispatcher.post(Box::new(move || bridge.handle_reply(id, reply)));
            }
        }
    });

    c.bench_function("bridge_round_trip", |b| {
        b.iter(|| black_box(bridge.call("PING").unwrap()));
    });

    event_loop.shutdown();
}

criterion_group!(benches, bench_pipe_throughput, bench_bridge_round_trip);
criterion_main!(benches);
