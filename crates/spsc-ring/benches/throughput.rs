use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spsc_ring::RingBuffer;
use std::thread;

const MESSAGES: u64 = 1_000_000;

fn bench_push_pop_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_thread");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_pop", |b| {
        let (mut tx, mut rx) = RingBuffer::<u64>::new(1024).split();
        let mut i = 0u64;
        b.iter(|| {
            tx.push(black_box(i));
            black_box(rx.pop());
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MESSAGES));

    for capacity in [64usize, 1024, 65536] {
        group.bench_with_input(
            BenchmarkId::new("pop", capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let (mut tx, mut rx) = RingBuffer::<u64>::new(capacity).split();

                    let producer = thread::spawn(move || {
                        for i in 0..MESSAGES {
                            while !tx.push(i) {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    let mut count = 0u64;
                    while count < MESSAGES {
                        match rx.pop() {
                            Some(v) => {
                                black_box(v);
                                count += 1;
                            }
                            None => std::hint::spin_loop(),
                        }
                    }

                    producer.join().unwrap();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("consume_batch", capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let (mut tx, mut rx) = RingBuffer::<u64>::new(capacity).split();

                    let producer = thread::spawn(move || {
                        for i in 0..MESSAGES {
                            while !tx.push(i) {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    let mut count = 0u64;
                    while count < MESSAGES {
                        let consumed = rx.consume_batch(|v| {
                            black_box(v);
                        });
                        if consumed == 0 {
                            std::hint::spin_loop();
                        }
                        count += consumed as u64;
                    }

                    producer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop_single_thread, bench_spsc);
criterion_main!(benches);
