//! Best-path decoding of a transition-posterior matrix.
use crate::error::{DecodeError, Result};
use crate::matrix::WeightMatrix;
use crate::posterior::flipflop_step;
use crate::states::{nbase_from_nstate, trans_index};
use log::debug;

/// Decode the single most likely state path from log transition posteriors.
///
/// `path` receives `nblocks + 1` state indices and `qpath` the posterior of
/// each traversed transition; `qpath[0]` is NaN since no transition leads
/// into the first state. Both buffers stay owned by the caller and are
/// overwritten in place. Returns the score of the best path.
///
/// Argmax ties resolve to the smallest state index, including the choice of
/// final state.
pub fn viterbi_decode(
    tpost: &WeightMatrix,
    path: &mut Vec<usize>,
    qpath: &mut Vec<f32>,
) -> Result<f32> {
    let nbase = nbase_from_nstate(tpost.nstate())?;
    let nblocks = tpost.nblocks();
    if nblocks == 0 {
        return Err(DecodeError::EmptyInput("posterior matrix has no blocks"));
    }
    debug!("viterbi: {} blocks, {} bases", nblocks, nbase);
    let nff = 2 * nbase;
    let mut prev = vec![0f32; nff];
    let mut curr = vec![0f32; nff];
    let mut traceback = vec![0usize; nblocks * nff];
    for block in 0..nblocks {
        let tb_row = &mut traceback[block * nff..(block + 1) * nff];
        flipflop_step(&prev, tpost.row(block), nbase, &mut curr, Some(tb_row));
        std::mem::swap(&mut prev, &mut curr);
    }
    let (mut last, mut score) = (0, prev[0]);
    for (state, &s) in prev.iter().enumerate().skip(1) {
        if s > score {
            score = s;
            last = state;
        }
    }
    path.clear();
    path.resize(nblocks + 1, 0);
    qpath.clear();
    qpath.resize(nblocks + 1, 0f32);
    path[nblocks] = last;
    for block in (1..=nblocks).rev() {
        path[block - 1] = traceback[(block - 1) * nff + path[block]];
    }
    qpath[0] = f32::NAN;
    for block in 1..=nblocks {
        let column = trans_index(path[block - 1], path[block], nbase);
        qpath[block] = tpost.get(block - 1, column);
    }
    Ok(score)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gen_weights;
    use crate::posterior::compute_transition_posteriors;
    use crate::states::ntrans_from_nbase;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    // Straightforward full-table rendition of the same recurrence, used to
    // pin the returned score to `max_d fwd[nblocks, d]`.
    fn forward_best(tpost: &WeightMatrix, nbase: usize) -> f32 {
        let nff = 2 * nbase;
        let flop_col = 2 * nbase * nbase;
        let mut fwd = vec![vec![0f32; nff]; tpost.nblocks() + 1];
        for block in 0..tpost.nblocks() {
            let row = tpost.row(block);
            for to in 0..nbase {
                fwd[block + 1][to] = (0..nff)
                    .map(|from| fwd[block][from] + row[to * nff + from])
                    .fold(f32::NEG_INFINITY, f32::max);
            }
            for to in nbase..nff {
                let flip = to - nbase;
                fwd[block + 1][to] = (fwd[block][flip] + row[flop_col + flip])
                    .max(fwd[block][to] + row[flop_col + to]);
            }
        }
        fwd[tpost.nblocks()]
            .iter()
            .fold(f32::NEG_INFINITY, |a, &b| a.max(b))
    }

    #[test]
    fn uniform_single_block() {
        let nbase = 2;
        let nstate = ntrans_from_nbase(nbase);
        let logprob = WeightMatrix::zeros(1, nstate);
        let tpost = compute_transition_posteriors(&logprob, true).unwrap();
        let (mut path, mut qpath) = (vec![], vec![]);
        let score = viterbi_decode(&tpost, &mut path, &mut qpath).unwrap();
        let expected = -(nstate as f32).ln();
        assert!((score - expected).abs() < 1e-5);
        // Every column ties, so everything resolves to state 0.
        assert_eq!(path, vec![0, 0]);
        assert!(qpath[0].is_nan());
        assert!((qpath[1] - expected).abs() < 1e-5);
    }

    #[test]
    fn ties_break_to_smallest_state() {
        // All-equal posteriors over three blocks: the decoded path must
        // stay on state 0 throughout rather than wander.
        let tpost = WeightMatrix::zeros(3, ntrans_from_nbase(4));
        let (mut path, mut qpath) = (vec![], vec![]);
        viterbi_decode(&tpost, &mut path, &mut qpath).unwrap();
        assert_eq!(path, vec![0; 4]);
    }

    #[test]
    fn score_matches_forward_recurrence() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(9120);
        for _ in 0..50 {
            let nbase = if rng.gen_bool(0.5) { 2 } else { 4 };
            let nblocks = rng.gen_range(1..40);
            let logprob = gen_weights::generate_weights(&mut rng, nblocks, nbase);
            let tpost = compute_transition_posteriors(&logprob, true).unwrap();
            let (mut path, mut qpath) = (vec![], vec![]);
            let score = viterbi_decode(&tpost, &mut path, &mut qpath).unwrap();
            let expected = forward_best(&tpost, nbase);
            assert!(
                (score - expected).abs() < 1e-3,
                "{} vs {}",
                score,
                expected
            );
        }
    }

    #[test]
    fn recovers_planted_path() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(9121);
        for _ in 0..20 {
            let nbase = 4;
            let nblocks = rng.gen_range(5..40);
            let seq: Vec<usize> = (0..rng.gen_range(1..5))
                .map(|_| rng.gen_range(0..nbase))
                .collect();
            let planted = gen_weights::stretch_path(&seq, nblocks, nbase);
            let logprob = gen_weights::weights_for_path(&planted, nbase, 100.0);
            let tpost = compute_transition_posteriors(&logprob, true).unwrap();
            let (mut path, mut qpath) = (vec![], vec![]);
            viterbi_decode(&tpost, &mut path, &mut qpath).unwrap();
            assert_eq!(path, planted);
            // Concentrated mass: every step of the path is near-certain.
            for &q in &qpath[1..] {
                assert!(q > -1e-2, "{}", q);
            }
        }
    }

    #[test]
    fn path_transitions_are_reachable() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(9122);
        let nbase = 4;
        let logprob = gen_weights::generate_weights(&mut rng, 50, nbase);
        let tpost = compute_transition_posteriors(&logprob, true).unwrap();
        let (mut path, mut qpath) = (vec![], vec![]);
        viterbi_decode(&tpost, &mut path, &mut qpath).unwrap();
        for w in path.windows(2) {
            let (from, to) = (w[0], w[1]);
            if to >= nbase {
                assert!(from == to || from + nbase == to, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn empty_matrix_is_an_error() {
        let tpost = WeightMatrix::zeros(0, 12);
        let (mut path, mut qpath) = (vec![], vec![]);
        assert!(matches!(
            viterbi_decode(&tpost, &mut path, &mut qpath),
            Err(DecodeError::EmptyInput(_))
        ));
    }
}
