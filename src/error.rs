//! Structured errors for the decoding core.
use thiserror::Error;

/// Everything that can go wrong while decoding or scoring.
///
/// All failures surface to the caller; nothing is recovered or logged
/// internally. Numerical underflow inside log-sum-exp is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The transition width is not `2B(B+1)` for any positive base count.
    #[error("invalid state count: {nstate} is not 2B(B+1) for any B")]
    InvalidStateCount { nstate: usize },
    /// The alphabet length disagrees with the base count implied by a matrix.
    #[error("alphabet of {alphabet} bases does not match a matrix over {matrix} bases")]
    AlphabetMismatch { alphabet: usize, matrix: usize },
    /// Zero blocks or a zero-length sequence where one is required.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    /// The scoring window would be empty: fewer blocks than sequence steps.
    #[error("{nblk} blocks cannot hold a sequence of {nseq} bases")]
    InsufficientBlocks { nblk: usize, nseq: usize },
    /// A posterior slice exceeds the matrix bounds.
    #[error("block range {start}..{end} out of bounds for {nblocks} blocks")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        nblocks: usize,
    },
    /// A sequence symbol or modification category outside the alphabet.
    #[error("invalid symbol {symbol} at position {pos} (limit {limit})")]
    InvalidSymbol {
        pos: usize,
        symbol: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
