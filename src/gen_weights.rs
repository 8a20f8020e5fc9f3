//! Random and planted weight matrices to assess the decoder.
//! Usually, these would not be used in real applications.
use crate::matrix::WeightMatrix;
use crate::states::{flip_mask_walk, ntrans_from_nbase, trans_index};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Uniform random log-weights over a flip-flop transition matrix.
pub fn generate_weights<R: Rng>(rng: &mut R, nblocks: usize, nbase: usize) -> WeightMatrix {
    let nstate = ntrans_from_nbase(nbase);
    let data: Vec<f32> = (0..nblocks * nstate)
        .map(|_| rng.gen_range(-4f32..0f32))
        .collect();
    WeightMatrix::from_vec(data, nstate).unwrap()
}

/// Seeded shorthand for [`generate_weights`].
pub fn generate_weights_seeded(seed: u64, nblocks: usize, nbase: usize) -> WeightMatrix {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(seed);
    generate_weights(&mut rng, nblocks, nbase)
}

/// Expand a base sequence into a state path over `nblocks + 1` positions,
/// spreading the steps evenly and filling the rest with stays. Requires
/// `nblocks + 1 >= seq.len()`.
pub fn stretch_path(seq: &[usize], nblocks: usize, nbase: usize) -> Vec<usize> {
    let walk = flip_mask_walk(seq, nbase);
    assert!(!walk.is_empty() && walk.len() <= nblocks + 1);
    let nsteps = walk.len() - 1;
    let mut path = Vec::with_capacity(nblocks + 1);
    path.push(walk[0]);
    let mut taken = 0;
    for block in 1..=nblocks {
        // Step whenever the remaining blocks would otherwise run out.
        let due = nsteps * block / nblocks.max(1);
        if taken < due {
            taken += 1;
        }
        path.push(walk[taken]);
    }
    path
}

/// Zero weights except a `boost` on every transition of `path`.
pub fn weights_for_path(path: &[usize], nbase: usize, boost: f32) -> WeightMatrix {
    assert!(path.len() > 1);
    let nblocks = path.len() - 1;
    let mut weights = WeightMatrix::zeros(nblocks, ntrans_from_nbase(nbase));
    for block in 0..nblocks {
        let column = trans_index(path[block], path[block + 1], nbase);
        weights.set(block, column, boost);
    }
    weights
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn stretch_consumes_whole_sequence() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(51);
        for _ in 0..50 {
            let nbase = 4;
            let nblocks = rng.gen_range(4..30);
            let nseq = rng.gen_range(1..=nblocks);
            let seq: Vec<usize> = (0..nseq).map(|_| rng.gen_range(0..nbase)).collect();
            let path = stretch_path(&seq, nblocks, nbase);
            assert_eq!(path.len(), nblocks + 1);
            let walk = flip_mask_walk(&seq, nbase);
            let mut dedup = path.clone();
            dedup.dedup();
            assert_eq!(dedup, walk);
        }
    }

    #[test]
    fn planted_weights_sit_on_the_path() {
        let path = stretch_path(&[0, 0, 1], 5, 4);
        let weights = weights_for_path(&path, 4, 50.0);
        for block in 0..weights.nblocks() {
            let hot: Vec<usize> = (0..weights.nstate())
                .filter(|&s| weights.get(block, s) > 0.0)
                .collect();
            assert_eq!(hot, vec![trans_index(path[block], path[block + 1], 4)]);
        }
    }
}
