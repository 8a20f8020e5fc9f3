//! Transition posteriors from raw per-block log-weights.
//!
//! The forward and backward passes below run in the max semiring: the value
//! attached to a transition is the log-score of the best path through it,
//! not the Baum-Welch sum over paths. Downstream calibration depends on the
//! Viterbi-flavored quantity, so the backward recurrence must not be
//! "fixed" into a log-sum-exp.
use crate::error::{DecodeError, Result};
use crate::matrix::WeightMatrix;
use crate::states::nbase_from_nstate;
use log::debug;

/// Numerically stable `log(exp(a) + exp(b))`.
pub(crate) fn logsumexp2(a: f32, b: f32) -> f32 {
    if a == f32::NEG_INFINITY {
        return b;
    }
    if b == f32::NEG_INFINITY {
        return a;
    }
    a.max(b) + (-(a - b).abs()).exp().ln_1p()
}

/// Fold of [`logsumexp2`] across a row.
pub(crate) fn logsumexp(row: &[f32]) -> f32 {
    row.iter().fold(f32::NEG_INFINITY, |acc, &x| logsumexp2(acc, x))
}

/// One block of the max-sum flip-flop recurrence, reading transition
/// weights from `row`. Writes the best score per destination into `curr`
/// and, when given, the argmax predecessor into `tb`. Ties break to the
/// earlier source state.
pub(crate) fn flipflop_step(
    prev: &[f32],
    row: &[f32],
    nbase: usize,
    curr: &mut [f32],
    mut tb: Option<&mut [usize]>,
) {
    let nff = 2 * nbase;
    for to in 0..nbase {
        let col = to * nff;
        let mut best = prev[0] + row[col];
        let mut best_from = 0;
        for (from, &p) in prev.iter().enumerate().skip(1) {
            let score = p + row[col + from];
            if score > best {
                best = score;
                best_from = from;
            }
        }
        curr[to] = best;
        if let Some(tb) = tb.as_deref_mut() {
            tb[to] = best_from;
        }
    }
    let flop_col = 2 * nbase * nbase;
    for to in nbase..nff {
        let flip = to - nbase;
        let mut best = prev[flip] + row[flop_col + flip];
        let mut best_from = flip;
        let score = prev[to] + row[flop_col + to];
        if score > best {
            best = score;
            best_from = to;
        }
        curr[to] = best;
        if let Some(tb) = tb.as_deref_mut() {
            tb[to] = best_from;
        }
    }
}

/// Normalize per-block transition log-weights into log-posteriors.
///
/// Runs the max-sum forward pass, then sweeps backward writing
/// `fwd[k, from] + bwd[k+1, to] + logprob[k, from->to]` into every allowed
/// transition column, and finally subtracts each block's log-sum-exp so the
/// rows are log-distributions. With `want_log = false` the same buffer is
/// exponentiated before returning.
pub fn compute_transition_posteriors(logprob: &WeightMatrix, want_log: bool) -> Result<WeightMatrix> {
    let nbase = nbase_from_nstate(logprob.nstate())?;
    let nblocks = logprob.nblocks();
    if nblocks == 0 {
        return Err(DecodeError::EmptyInput("weight matrix has no blocks"));
    }
    debug!(
        "transition posteriors: {} blocks, {} bases, log={}",
        nblocks, nbase, want_log
    );
    let nff = 2 * nbase;
    let mut fwd = vec![0f32; (nblocks + 1) * nff];
    for block in 0..nblocks {
        let (prev, curr) = fwd[block * nff..(block + 2) * nff].split_at_mut(nff);
        flipflop_step(prev, logprob.row(block), nbase, curr, None);
    }
    let mut tpost = WeightMatrix::zeros(nblocks, logprob.nstate());
    let mut bwd = vec![0f32; nff];
    let mut bwd_prev = vec![0f32; nff];
    let flop_col = 2 * nbase * nbase;
    for block in (0..nblocks).rev() {
        let fwd_row = &fwd[block * nff..(block + 1) * nff];
        let row = logprob.row(block);
        let out = tpost.row_mut(block);
        for to in 0..nbase {
            for from in 0..nff {
                out[to * nff + from] = fwd_row[from] + bwd[to] + row[to * nff + from];
            }
        }
        for from in 0..nff {
            let to = if from < nbase { from + nbase } else { from };
            out[flop_col + from] = fwd_row[from] + bwd[to] + row[flop_col + from];
        }
        // bwd[k, from] = max over destinations of weight + bwd[k+1, to].
        for from in 0..nff {
            let mut best = f32::NEG_INFINITY;
            for (to, &b) in bwd.iter().enumerate().take(nbase) {
                let score = row[to * nff + from] + b;
                if score > best {
                    best = score;
                }
            }
            let to = if from < nbase { from + nbase } else { from };
            let score = row[flop_col + from] + bwd[to];
            if score > best {
                best = score;
            }
            bwd_prev[from] = best;
        }
        std::mem::swap(&mut bwd, &mut bwd_prev);
    }
    for block in 0..nblocks {
        let row = tpost.row_mut(block);
        let norm = logsumexp(row);
        row.iter_mut().for_each(|x| *x -= norm);
    }
    if !want_log {
        tpost.data_mut().iter_mut().for_each(|x| *x = x.exp());
    }
    Ok(tpost)
}
