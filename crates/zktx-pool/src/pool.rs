//! The commitment pool (`C2`): an append-only ordered sequence of note
//! commitments with a reverse index, mirroring `cm_pool.cpp`'s
//! `CMPool::{set, append, size, get_index, for_each_cm_range}`.
//!
//! Position 0 is conventionally the distinguished [`zero_cm`] sentinel —
//! [`CommitmentPool::new`] seeds it so that a freshly constructed pool
//! already matches the zero-value-escape convention of `C8`.

use std::collections::HashMap;

use zktx_core::constants::zero_cm;
use zktx_core::{Bytes32, TxError};

/// Append-only pool of note commitments plus a commitment-to-position index.
///
/// Not thread-safe: concurrent callers must hold external exclusion, as
/// documented by the concurrency model this pool is part of.
#[derive(Debug, Clone)]
pub struct CommitmentPool {
    commitments: Vec<Bytes32>,
    index: HashMap<Bytes32, usize>,
}

impl CommitmentPool {
    /// Creates a pool seeded with `ZERO_CM` at position 0.
    #[must_use]
    pub fn new() -> Self {
        let mut pool = Self {
            commitments: Vec::new(),
            index: HashMap::new(),
        };
        pool.append(zero_cm());
        pool
    }

    /// Appends a commitment, returning its position.
    ///
    /// Duplicate insertion overwrites the reverse index for that
    /// commitment value — callers must avoid duplicates.
    pub fn append(&mut self, cm: Bytes32) -> usize {
        let position = self.commitments.len();
        self.commitments.push(cm);
        self.index.insert(cm, position);
        position
    }

    /// Overwrites the commitment at position `i`, growing the pool with
    /// [`Bytes32::ZERO`] placeholders if `i` is beyond the current size.
    pub fn set(&mut self, i: usize, cm: Bytes32) {
        if i >= self.commitments.len() {
            self.commitments.resize(i.saturating_add(1), Bytes32::ZERO);
        }
        if let Some(slot) = self.commitments.get_mut(i) {
            let previous = *slot;
            if self.index.get(&previous) == Some(&i) {
                self.index.remove(&previous);
            }
            *slot = cm;
        }
        self.index.insert(cm, i);
    }

    /// Number of commitments currently in the pool.
    #[must_use]
    pub fn size(&self) -> usize {
        self.commitments.len()
    }

    /// Returns the commitment stored at `i`, if any.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Bytes32> {
        self.commitments.get(i).copied()
    }

    /// Looks up the position of a commitment.
    ///
    /// # Errors
    /// Returns [`TxError::CmNotFound`] if `cm` is not in the pool.
    pub fn get_index(&self, cm: &Bytes32) -> Result<usize, TxError> {
        self.index.get(cm).copied().ok_or(TxError::CmNotFound)
    }

    /// Calls `f(position, commitment)` for every position in the
    /// inclusive range `[from, to]`.
    ///
    /// # Errors
    /// Returns [`TxError::CmPoolRange`] if `from > to` or `to` is out of
    /// bounds.
    pub fn for_each_range(
        &self,
        from: usize,
        to: usize,
        mut f: impl FnMut(usize, Bytes32),
    ) -> Result<(), TxError> {
        let size = self.size();
        if from > to || to >= size {
            return Err(TxError::CmPoolRange { from, to, size });
        }
        for i in from..=to {
            if let Some(cm) = self.commitments.get(i).copied() {
                f(i, cm);
            }
        }
        Ok(())
    }
}

impl Default for CommitmentPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_seeds_zero_cm_at_position_zero() {
        let pool = CommitmentPool::new();
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.get(0), Some(zero_cm()));
        assert_eq!(pool.get_index(&zero_cm()).expect("present"), 0);
    }

    #[test]
    fn append_and_lookup_round_trip() {
        let mut pool = CommitmentPool::new();
        let cm = Bytes32::from_hex("cm", "aa").expect("valid hex");
        let position = pool.append(cm);
        assert_eq!(position, 1);
        assert_eq!(pool.get_index(&cm).expect("present"), 1);
    }

    #[test]
    fn missing_commitment_errors() {
        let pool = CommitmentPool::new();
        let cm = Bytes32::from_hex("cm", "bb").expect("valid hex");
        assert!(matches!(pool.get_index(&cm), Err(TxError::CmNotFound)));
    }

    #[test]
    fn range_out_of_bounds_errors() {
        let pool = CommitmentPool::new();
        assert!(matches!(
            pool.for_each_range(0, 5, |_, _| {}),
            Err(TxError::CmPoolRange { .. })
        ));
    }

    #[test]
    fn range_iterates_in_order() {
        let mut pool = CommitmentPool::new();
        for i in 1..=3u8 {
            let mut bytes = [0u8; 32];
            bytes[31] = i;
            pool.append(Bytes32::from_be_bytes(bytes));
        }
        let mut seen = Vec::new();
        pool.for_each_range(0, 3, |i, cm| seen.push((i, cm)))
            .expect("valid range");
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].0, 0);
        assert_eq!(seen[3].0, 3);
    }

    #[test]
    fn set_overwrites_reverse_index() {
        let mut pool = CommitmentPool::new();
        let cm_a = Bytes32::from_hex("cm", "aa").expect("valid hex");
        let cm_b = Bytes32::from_hex("cm", "bb").expect("valid hex");
        pool.append(cm_a);
        pool.set(1, cm_b);
        assert!(matches!(pool.get_index(&cm_a), Err(TxError::CmNotFound)));
        assert_eq!(pool.get_index(&cm_b).expect("present"), 1);
    }
}
