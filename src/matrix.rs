//! A row-major block-by-state matrix over a flat buffer.
use crate::error::{DecodeError, Result};

/// Per-block weight matrix. Rows are network output blocks, columns are
/// transition states (or any other per-block channel layout). It is a
/// serialized 2-d array; all log-domain arithmetic on it is `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    data: Vec<f32>,
    nstate: usize,
}

impl WeightMatrix {
    /// Wrap a row-major buffer of `nstate`-wide rows.
    pub fn from_vec(data: Vec<f32>, nstate: usize) -> Result<Self> {
        if nstate == 0 || data.len() % nstate != 0 {
            return Err(DecodeError::InvalidStateCount { nstate });
        }
        Ok(Self { data, nstate })
    }
    pub fn zeros(nblocks: usize, nstate: usize) -> Self {
        Self {
            data: vec![0f32; nblocks * nstate],
            nstate,
        }
    }
    pub fn filled(nblocks: usize, nstate: usize, value: f32) -> Self {
        Self {
            data: vec![value; nblocks * nstate],
            nstate,
        }
    }
    pub fn nblocks(&self) -> usize {
        self.data.len() / self.nstate
    }
    pub fn nstate(&self) -> usize {
        self.nstate
    }
    pub fn get(&self, block: usize, state: usize) -> f32 {
        debug_assert!(state < self.nstate);
        self.data[block * self.nstate + state]
    }
    pub fn set(&mut self, block: usize, state: usize, value: f32) {
        debug_assert!(state < self.nstate);
        self.data[block * self.nstate + state] = value;
    }
    pub fn row(&self, block: usize) -> &[f32] {
        &self.data[block * self.nstate..(block + 1) * self.nstate]
    }
    pub(crate) fn row_mut(&mut self, block: usize) -> &mut [f32] {
        &mut self.data[block * self.nstate..(block + 1) * self.nstate]
    }
    pub fn data(&self) -> &[f32] {
        &self.data
    }
    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
