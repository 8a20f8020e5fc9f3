use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flipflop::{
    compute_transition_posteriors, decode_posteriors, gen_weights, score_sequence, viterbi_decode,
    Alphabet,
};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

const SEED: u64 = 1293890;
const NBLOCKS: usize = 500;
const NBASE: usize = 4;

fn bench_transition_posteriors(c: &mut Criterion) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let logprob = gen_weights::generate_weights(&mut rng, NBLOCKS, NBASE);
    c.bench_function("transition_posteriors", |b| {
        b.iter(|| black_box(compute_transition_posteriors(&logprob, true).unwrap()))
    });
}

fn bench_viterbi(c: &mut Criterion) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let logprob = gen_weights::generate_weights(&mut rng, NBLOCKS, NBASE);
    let tpost = compute_transition_posteriors(&logprob, true).unwrap();
    c.bench_function("viterbi_decode", |b| {
        b.iter(|| {
            let (mut path, mut qpath) = (vec![], vec![]);
            black_box(viterbi_decode(&tpost, &mut path, &mut qpath).unwrap())
        })
    });
}

fn bench_score_sequence(c: &mut Criterion) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let logprob = gen_weights::generate_weights(&mut rng, NBLOCKS, NBASE);
    let tpost = compute_transition_posteriors(&logprob, true).unwrap();
    let seq: Vec<usize> = (0..NBLOCKS / 2).map(|_| rng.gen_range(0..NBASE)).collect();
    c.bench_function("score_sequence_all_paths", |b| {
        b.iter(|| black_box(score_sequence(&tpost, &seq, 0, NBLOCKS, true).unwrap()))
    });
    c.bench_function("score_sequence_best_path", |b| {
        b.iter(|| black_box(score_sequence(&tpost, &seq, 0, NBLOCKS, false).unwrap()))
    });
}

fn bench_decode_posteriors(c: &mut Criterion) {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let logprob = gen_weights::generate_weights(&mut rng, NBLOCKS, NBASE);
    let tpost = compute_transition_posteriors(&logprob, true).unwrap();
    let alphabet = Alphabet::dna();
    c.bench_function("decode_posteriors", |b| {
        b.iter(|| black_box(decode_posteriors(&tpost, &alphabet, None).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_transition_posteriors,
    bench_viterbi,
    bench_score_sequence,
    bench_decode_posteriors
);
criterion_main!(benches);
