//! Producer/consumer walkthrough for spsc-ring.
//!
//! Run with: `cargo run -p spsc-ring --bin demo --release`
//!
//! One thread pushes `0..MESSAGES`, another pops and sums. Both waiting
//! policies live here, not in the ring: the producer retries a full ring
//! (spin, yield, then sleep) and drops a value only if the consumer frees no
//! slot for `STALL_TIMEOUT`; the consumer sleeps briefly whenever the ring
//! looks empty.

use spsc_ring::{push_with_patience, Config, RingBuffer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const MESSAGES: u64 = 1_000_000;
const CAPACITY: usize = 1024;
const EMPTY_SLEEP: Duration = Duration::from_micros(50);
const STALL_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("spsc-ring Demo");
    println!("==============\n");

    let config = Config::new(CAPACITY, true);
    let (mut producer, mut consumer) = RingBuffer::<u64>::with_config(config)?.split();

    println!("Configuration:");
    println!("  Slots: {} ({} usable)", config.capacity(), config.usable_capacity());
    println!("  Messages: {}\n", MESSAGES);

    let done = Arc::new(AtomicBool::new(false));
    let done_producer = Arc::clone(&done);

    let start = Instant::now();

    let producer_handle = thread::spawn(move || {
        let mut sent = 0u64;
        let mut dropped = 0u64;
        for i in 0..MESSAGES {
            match push_with_patience(&mut producer, i, STALL_TIMEOUT) {
                Ok(()) => sent += 1,
                // No slot freed for a whole STALL_TIMEOUT: the consumer is stuck
                Err(_) => dropped += 1,
            }
        }

        done_producer.store(true, Ordering::Release);
        (sent, dropped)
    });

    let consumer_handle = thread::spawn(move || {
        let mut received = 0u64;
        let mut sum = 0u64;
        let mut sleeps = 0u64;

        loop {
            let consumed = consumer.consume_batch(|v| sum += v);
            received += consumed as u64;

            if consumed == 0 {
                if done.load(Ordering::Acquire) && consumer.is_empty() {
                    break;
                }
                sleeps += 1;
                thread::sleep(EMPTY_SLEEP);
            }
        }

        (received, sum, sleeps, consumer.metrics())
    });

    let (sent, dropped) = producer_handle
        .join()
        .map_err(|_| "producer thread panicked")?;
    let (received, sum, sleeps, metrics) = consumer_handle
        .join()
        .map_err(|_| "consumer thread panicked")?;

    let elapsed = start.elapsed();

    println!("Results:");
    println!("  Sent: {}", sent);
    println!("  Dropped (consumer stalled {:?}): {}", STALL_TIMEOUT, dropped);
    println!("  Received: {}", received);
    println!("  Sum: {}", sum);
    println!("  Consumer sleeps: {}", sleeps);
    println!("  Elapsed: {:.2?}", elapsed);
    println!(
        "  Throughput: {:.2} M msg/s",
        received as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    println!("\nMetrics:");
    println!("  pushed: {}", metrics.pushed);
    println!("  full rejections: {}", metrics.full_rejections);
    println!("  popped: {}", metrics.popped);
    println!("  empty polls: {}", metrics.empty_polls);

    if dropped == 0 {
        let expected = MESSAGES * (MESSAGES - 1) / 2;
        println!(
            "\nChecksum: {}",
            if sum == expected { "OK" } else { "MISMATCH" }
        );
    }

    Ok(())
}
