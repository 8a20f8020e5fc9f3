//! Arithmetic of the flip-flop state space.
//!
//! Every canonical base owns two states: a flip state `b` and a flop state
//! `b + nbase`. Consecutive identical bases in a decoded sequence alternate
//! between the two roles, which is what lets the decoder tell a homopolymer
//! step from a stay.
use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};

/// Transition-state width for a given base count.
pub const fn ntrans_from_nbase(nbase: usize) -> usize {
    2 * nbase * (nbase + 1)
}

/// Recover the base count from a transition-state width of `2B(B+1)`.
pub fn nbase_from_nstate(nstate: usize) -> Result<usize> {
    let nbase = ((0.25 + nstate as f64 / 2.0).sqrt() - 0.5).floor() as usize;
    if nbase == 0 || ntrans_from_nbase(nbase) != nstate {
        return Err(DecodeError::InvalidStateCount { nstate });
    }
    Ok(nbase)
}

/// Column of the `from -> to` transition.
///
/// Flip destinations expand over every source state; all flop destinations
/// share one `2·nbase`-wide column block addressed by the source alone. The
/// layout is a contract with the upstream weight producer.
pub fn trans_index(from: usize, to: usize, nbase: usize) -> usize {
    debug_assert!(from < 2 * nbase && to < 2 * nbase);
    if to < nbase {
        to * 2 * nbase + from
    } else {
        debug_assert!(from == to || from + nbase == to, "unreachable transition");
        2 * nbase * nbase + from
    }
}

/// Assign a flip or flop state to each position of a base sequence.
///
/// `fm[0] = seq[0]`, and `fm[i]` is the flop partner of `seq[i]` exactly
/// when `seq[i]` equals `fm[i-1]`.
pub fn flip_mask_walk(seq: &[usize], nbase: usize) -> Vec<usize> {
    let mut walk = Vec::with_capacity(seq.len());
    let mut prev = usize::MAX;
    for &base in seq {
        let state = if base == prev { base + nbase } else { base };
        walk.push(state);
        prev = state;
    }
    walk
}

/// Stay and step transition columns along a base sequence.
///
/// `stay[i]` is the self-transition of position `i`'s state; `step[i-1]`
/// moves from position `i-1`'s state into position `i`'s.
pub fn stay_step_indices(seq: &[usize], nbase: usize) -> (Vec<usize>, Vec<usize>) {
    let walk = flip_mask_walk(seq, nbase);
    let stay = walk.iter().map(|&s| trans_index(s, s, nbase)).collect();
    let step = walk
        .windows(2)
        .map(|w| trans_index(w[0], w[1], nbase))
        .collect();
    (stay, step)
}

/// A canonical alphabet with optional modified-base variants per base.
///
/// The modification offsets are the prefix sums of the per-base variant
/// counts, so category `c` of base `b` lives at column
/// `nstate + mods_offset(b) + c` of an extended posterior matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<u8>,
    can_nmods: Vec<usize>,
    mods_offsets: Vec<usize>,
}

impl Alphabet {
    /// Build an alphabet of distinct symbols with per-base modification
    /// counts. Pass an empty `can_nmods` for an all-canonical alphabet.
    pub fn new(symbols: &[u8], can_nmods: &[usize]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(DecodeError::EmptyInput("alphabet has no symbols"));
        }
        for (i, &s) in symbols.iter().enumerate() {
            if symbols[..i].contains(&s) {
                return Err(DecodeError::InvalidSymbol {
                    pos: i,
                    symbol: s as usize,
                    limit: symbols.len(),
                });
            }
        }
        let can_nmods = match can_nmods.is_empty() {
            true => vec![0; symbols.len()],
            false => can_nmods.to_vec(),
        };
        if can_nmods.len() != symbols.len() {
            return Err(DecodeError::AlphabetMismatch {
                alphabet: symbols.len(),
                matrix: can_nmods.len(),
            });
        }
        let mut mods_offsets = Vec::with_capacity(can_nmods.len() + 1);
        let mut total = 0;
        mods_offsets.push(0);
        for &n in can_nmods.iter() {
            total += n;
            mods_offsets.push(total);
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            can_nmods,
            mods_offsets,
        })
    }
    /// The canonical DNA alphabet, no modifications.
    pub fn dna() -> Self {
        Self::new(crate::ALPHABET, &[]).unwrap()
    }
    pub fn nbase(&self) -> usize {
        self.symbols.len()
    }
    /// Transition-state width of the canonical (unextended) matrix.
    pub fn nstate(&self) -> usize {
        ntrans_from_nbase(self.nbase())
    }
    /// Total number of modified variants over all bases.
    pub fn nmod(&self) -> usize {
        *self.mods_offsets.last().unwrap()
    }
    pub fn can_nmods(&self, base: usize) -> usize {
        self.can_nmods[base]
    }
    pub fn mods_offset(&self, base: usize) -> usize {
        self.mods_offsets[base]
    }
    pub fn symbol(&self, base: usize) -> u8 {
        self.symbols[base]
    }
}
