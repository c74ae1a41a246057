//! Session stepping benchmarks

use aiva_core::SessionId;
use aiva_voice::{FixedPitch, RandomPitch, SimulationSession, Tick};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SENTENCE: &str = "Merhaba! Bugün hava çok güzel, seninle konuşmak için sabırsızlanıyorum. ";

fn drain(text: &str, pitch: &mut dyn aiva_voice::PitchSource) -> usize {
    let mut session = SimulationSession::new(SessionId::new(1), text);
    let mut count = 0;
    while let Tick::Sample { sample, .. } = session.tick(pitch) {
        black_box(sample);
        count += 1;
    }
    count
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_drain");

    for repeat in [1usize, 10, 100] {
        let text = SENTENCE.repeat(repeat);
        group.throughput(Throughput::Elements(text.chars().count() as u64));

        group.bench_with_input(BenchmarkId::new("fixed_pitch", repeat), &text, |b, text| {
            let mut pitch = FixedPitch::new(0.8);
            b.iter(|| drain(black_box(text), &mut pitch))
        });

        group.bench_with_input(BenchmarkId::new("random_pitch", repeat), &text, |b, text| {
            let mut pitch = RandomPitch::seeded(7);
            b.iter(|| drain(black_box(text), &mut pitch))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
