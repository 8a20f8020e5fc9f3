//! Scoring proposed sequences against a window of the posterior matrix.
//!
//! The lattice is `(sequence position) x (window offset)`: offset `w`
//! counts the stays spent beyond the minimum number of blocks. Both
//! semirings share the recurrence; "best path" combines with `max`,
//! "all paths" with log-sum-exp.
use crate::error::{DecodeError, Result};
use crate::matrix::WeightMatrix;
use crate::posterior::logsumexp2;
use crate::states::{nbase_from_nstate, stay_step_indices, Alphabet};
use rayon::prelude::*;

fn check_window(tpost: &WeightMatrix, seq: &[usize], start: usize, end: usize) -> Result<usize> {
    if end > tpost.nblocks() || start > end {
        return Err(DecodeError::RangeOutOfBounds {
            start,
            end,
            nblocks: tpost.nblocks(),
        });
    }
    if seq.is_empty() {
        return Err(DecodeError::EmptyInput("proposed sequence is empty"));
    }
    let nblk = end - start;
    if nblk + 1 < seq.len() {
        return Err(DecodeError::InsufficientBlocks {
            nblk,
            nseq: seq.len(),
        });
    }
    Ok(nblk)
}

fn check_symbols(seq: &[usize], nbase: usize) -> Result<()> {
    for (pos, &base) in seq.iter().enumerate() {
        if base >= nbase {
            return Err(DecodeError::InvalidSymbol {
                pos,
                symbol: base,
                limit: nbase,
            });
        }
    }
    Ok(())
}

// Two-rail sweep over the scoring lattice. `mod_cols[i]` is the extended
// column charged when entering position `i`; position 0's channel rides on
// the row-0 stays instead, since nothing ever steps into it.
fn score_window(
    tpost: &WeightMatrix,
    stay: &[usize],
    step: &[usize],
    mod_cols: Option<&[usize]>,
    start: usize,
    width: usize,
    all_paths: bool,
) -> f32 {
    let mut prev = vec![0f32; width];
    for w in 1..width {
        let block = start + w - 1;
        let mut score = prev[w - 1] + tpost.get(block, stay[0]);
        if let Some(cols) = mod_cols {
            score += tpost.get(block, cols[0]);
        }
        prev[w] = score;
    }
    let mut curr = vec![0f32; width];
    for pos in 1..stay.len() {
        for w in 0..width {
            let block = start + pos + w - 1;
            let mut score = prev[w] + tpost.get(block, step[pos - 1]);
            if let Some(cols) = mod_cols {
                score += tpost.get(block, cols[pos]);
            }
            if w > 0 {
                let stayed = curr[w - 1] + tpost.get(block, stay[pos]);
                score = match all_paths {
                    true => logsumexp2(score, stayed),
                    false => score.max(stayed),
                };
            }
            curr[w] = score;
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[width - 1]
}

/// Score the agreement between `seq` and the posterior slice
/// `tpost[tpost_start..tpost_end]`. With `all_paths` the result marginalizes
/// over every alignment of the sequence to the window; otherwise it is the
/// best single alignment.
pub fn score_sequence(
    tpost: &WeightMatrix,
    seq: &[usize],
    tpost_start: usize,
    tpost_end: usize,
    all_paths: bool,
) -> Result<f32> {
    let nbase = nbase_from_nstate(tpost.nstate())?;
    let nblk = check_window(tpost, seq, tpost_start, tpost_end)?;
    check_symbols(seq, nbase)?;
    let (stay, step) = stay_step_indices(seq, nbase);
    let width = nblk + 2 - seq.len();
    Ok(score_window(
        tpost, &stay, &step, None, tpost_start, width, all_paths,
    ))
}

/// [`score_sequence`] over a matrix extended with modified-base columns.
///
/// `mod_cats[i]` picks the modification category of `seq[i]`; its
/// log-weight is read from column `nstate + mods_offset(seq[i]) +
/// mod_cats[i]` at the block of the step into position `i`.
pub fn score_mod_sequence(
    tpost: &WeightMatrix,
    seq: &[usize],
    mod_cats: &[usize],
    alphabet: &Alphabet,
    tpost_start: usize,
    tpost_end: usize,
    all_paths: bool,
) -> Result<f32> {
    assert_eq!(seq.len(), mod_cats.len());
    let nbase = alphabet.nbase();
    let nstate = alphabet.nstate();
    if tpost.nstate() != nstate + alphabet.nmod() {
        return Err(DecodeError::InvalidStateCount {
            nstate: tpost.nstate(),
        });
    }
    let nblk = check_window(tpost, seq, tpost_start, tpost_end)?;
    check_symbols(seq, nbase)?;
    for (pos, (&base, &cat)) in seq.iter().zip(mod_cats).enumerate() {
        if cat >= alphabet.can_nmods(base) {
            return Err(DecodeError::InvalidSymbol {
                pos,
                symbol: cat,
                limit: alphabet.can_nmods(base),
            });
        }
    }
    let (stay, step) = stay_step_indices(seq, nbase);
    let mod_cols: Vec<usize> = seq
        .iter()
        .zip(mod_cats)
        .map(|(&base, &cat)| nstate + alphabet.mods_offset(base) + cat)
        .collect();
    let width = nblk + 2 - seq.len();
    Ok(score_window(
        tpost,
        &stay,
        &step,
        Some(&mod_cols),
        tpost_start,
        width,
        all_paths,
    ))
}

/// One proposed sequence against a window of the posterior matrix.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub seq: Vec<usize>,
    pub tpost_start: usize,
    pub tpost_end: usize,
}

/// Score many candidates against the same posterior matrix in parallel.
/// Results preserve the input order; each failure is reported in place.
pub fn score_candidates(
    tpost: &WeightMatrix,
    candidates: &[Candidate],
    all_paths: bool,
) -> Vec<Result<f32>> {
    candidates
        .par_iter()
        .map(|c| score_sequence(tpost, &c.seq, c.tpost_start, c.tpost_end, all_paths))
        .collect()
}
