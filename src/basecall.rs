//! Reducing a decoded state path to a base call.
use crate::error::{DecodeError, Result};
use crate::matrix::WeightMatrix;
use crate::states::{nbase_from_nstate, Alphabet};
use crate::viterbi::viterbi_decode;
use log::debug;

/// Run-length encode by equality on adjacent entries.
pub fn run_length_encode(path: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let (mut values, mut lengths) = (vec![], vec![]);
    for &state in path {
        match values.last() {
            Some(&last) if last == state => *lengths.last_mut().unwrap() += 1,
            _ => {
                values.push(state);
                lengths.push(1);
            }
        }
    }
    (values, lengths)
}

/// A decoded read: the called bases, the path score, the block index at
/// which each run begins, and per-call modification scores when a
/// modification-weight matrix was supplied.
#[derive(Debug, Clone)]
pub struct Basecall {
    pub basecall: String,
    pub score: f32,
    pub rl_cumsum: Vec<usize>,
    pub mods_scores: Option<WeightMatrix>,
}

// mod_weights interleaves one canonical channel and the base's modification
// channels per base, canonical first.
fn mod_weights_column(alphabet: &Alphabet, base: usize) -> usize {
    (0..base).map(|b| 1 + alphabet.can_nmods(b)).sum::<usize>() + 1
}

fn gather_mods_scores(
    mod_weights: &WeightMatrix,
    alphabet: &Alphabet,
    values: &[usize],
    rl_cumsum: &[usize],
) -> WeightMatrix {
    let nbase = alphabet.nbase();
    let mut scores = WeightMatrix::filled(values.len(), alphabet.nmod(), f32::NAN);
    // The first run is never stepped into; it keeps its NaN row.
    for run in 1..values.len() {
        let base = values[run] % nbase;
        let column = mod_weights_column(alphabet, base);
        let block = rl_cumsum[run] - 1;
        for cat in 0..alphabet.can_nmods(base) {
            let offset = alphabet.mods_offset(base) + cat;
            scores.set(run, offset, mod_weights.get(block, column + cat));
        }
    }
    scores
}

/// Decode a read's transition posteriors into a base call.
///
/// Runs the Viterbi decode, run-length encodes the state path and emits one
/// symbol per run. When `mod_weights` is given (per-block, one canonical
/// channel plus the base's modification channels per base), the
/// modification scores at each run's entry block are gathered into a
/// `nruns x nmod` matrix, NaN everywhere a run's base has no such channel.
pub fn decode_posteriors(
    r_post: &WeightMatrix,
    alphabet: &Alphabet,
    mod_weights: Option<&WeightMatrix>,
) -> Result<Basecall> {
    let nbase = nbase_from_nstate(r_post.nstate())?;
    if nbase != alphabet.nbase() {
        return Err(DecodeError::AlphabetMismatch {
            alphabet: alphabet.nbase(),
            matrix: nbase,
        });
    }
    if let Some(weights) = mod_weights {
        let expected: usize = (0..nbase).map(|b| 1 + alphabet.can_nmods(b)).sum();
        if weights.nstate() != expected || weights.nblocks() != r_post.nblocks() {
            return Err(DecodeError::InvalidStateCount {
                nstate: weights.nstate(),
            });
        }
    }
    let (mut path, mut qpath) = (vec![], vec![]);
    let score = viterbi_decode(r_post, &mut path, &mut qpath)?;
    let (values, lengths) = run_length_encode(&path);
    debug!("decoded {} blocks into {} runs", r_post.nblocks(), values.len());
    let basecall: String = values
        .iter()
        .map(|&v| alphabet.symbol(v % nbase) as char)
        .collect();
    let mut rl_cumsum = Vec::with_capacity(values.len() + 1);
    rl_cumsum.push(0);
    let mut total = 0;
    for &len in &lengths {
        total += len;
        rl_cumsum.push(total);
    }
    let mods_scores = match mod_weights {
        Some(weights) if alphabet.nmod() > 0 => {
            Some(gather_mods_scores(weights, alphabet, &values, &rl_cumsum))
        }
        _ => None,
    };
    Ok(Basecall {
        basecall,
        score,
        rl_cumsum,
        mods_scores,
    })
}
