//! Flip-flop CRF decoding and sequence scoring for nanopore base calling.
//!
//! A recurrent network emits, for every signal block, a vector of
//! transition log-weights over a flip-flop state space. This crate turns
//! those weights into normalized transition posteriors (max-semiring
//! forward-backward), decodes the best state path with per-step qualities,
//! scores proposed sequences against posterior windows in either the
//! best-path or all-paths semiring (optionally with modified-base
//! channels), and reduces a state path to a base call.
//!
//! ```
//! use flipflop::{compute_transition_posteriors, decode_posteriors, Alphabet, WeightMatrix};
//!
//! // Two-base alphabet: 2B(B+1) = 12 transition states per block.
//! let logprob = WeightMatrix::zeros(4, 12);
//! let tpost = compute_transition_posteriors(&logprob, true).unwrap();
//! let alphabet = Alphabet::new(b"AC", &[]).unwrap();
//! let call = decode_posteriors(&tpost, &alphabet, None).unwrap();
//! assert_eq!(call.basecall, "A");
//! ```
pub mod basecall;
pub mod error;
pub mod gen_weights;
pub mod matrix;
pub mod posterior;
pub mod scoring;
pub mod states;
pub mod viterbi;

pub use basecall::{decode_posteriors, run_length_encode, Basecall};
pub use error::{DecodeError, Result};
pub use matrix::WeightMatrix;
pub use posterior::compute_transition_posteriors;
pub use scoring::{score_candidates, score_mod_sequence, score_sequence, Candidate};
pub use states::{
    flip_mask_walk, nbase_from_nstate, ntrans_from_nbase, stay_step_indices, trans_index, Alphabet,
};
pub use viterbi::viterbi_decode;

/// Canonical DNA symbols, in state order.
pub const ALPHABET: &[u8] = b"ACGT";
