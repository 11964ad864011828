//! The windowed incremental Merkle tree that backs `C8`'s membership
//! proof: a depth-`MERKLE_DEPTH` binary tree built over a randomly chosen
//! contiguous window of the commitment pool, hiding a spent note's
//! absolute position while keeping the resulting root publicly
//! re-computable by anyone holding the same pool.
//!
//! The inner hash is the shared SHA-256-compression primitive
//! ([`zktx_core::hash::compress_pair`]) — the same block function the
//! PRF/SN/CM calculators use, just applied here to two 256-bit
//! half-blocks instead of a structured note layout.

use rand::Rng;
use zktx_core::constants::{self, zero_cm};
use zktx_core::hash::compress_pair;
use zktx_core::{Bytes32, TxError};

use crate::pool::CommitmentPool;

/// A Merkle authentication path for one leaf of a windowed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleWitness {
    /// Root of the window's tree.
    pub root: Bytes32,
    /// Sibling hash at each depth, leaf to root.
    pub path: Vec<Bytes32>,
    /// `true` at depth `d` if the witnessed leaf is the right child at
    /// that level (leaf-to-root order, matching `path`).
    pub index_bits: Vec<bool>,
}

/// Combines two child hashes into their parent using the shared
/// compression primitive as the tree's inner hash.
#[must_use]
pub fn combine(left: Bytes32, right: Bytes32) -> Bytes32 {
    Bytes32::from_be_bytes(compress_pair(&left.to_be_bytes(), &right.to_be_bytes()))
}

/// Picks a random contiguous window `[from, to]` of the pool containing
/// `target`, with `to - from + 1 <= 2^MERKLE_DEPTH` and `to < pool_size`.
///
/// The randomization is privacy obfuscation, not a security boundary
/// (spec §5) — any `Rng` is acceptable here, unlike `r`/`y` which must be
/// CSPRNG-sourced.
pub fn select_window(rng: &mut impl Rng, pool_size: usize, target: usize) -> (usize, usize) {
    let capacity = constants::merkle_capacity();
    let max_window = capacity.min(pool_size).max(1);
    let width = rng.random_range(1..=max_window);

    let from_floor = target.saturating_sub(width.saturating_sub(1));
    let from_ceiling = target.min(pool_size.saturating_sub(width));
    let from = if from_ceiling >= from_floor {
        rng.random_range(from_floor..=from_ceiling)
    } else {
        from_floor.min(pool_size.saturating_sub(1))
    };
    let to = (from.saturating_add(width).saturating_sub(1)).min(pool_size.saturating_sub(1));
    (from, to)
}

/// Builds the windowed tree over `[from, to]` and returns the
/// authentication path for `target`, a position within that window.
///
/// Positions within the window but beyond the pool's populated range are
/// not possible by construction (`to < pool.size()`); slots beyond the
/// window's width up to the tree's full `2^MERKLE_DEPTH` capacity are
/// padded with [`zero_cm`].
///
/// # Errors
/// Returns [`TxError::CmPoolRange`] if the window is malformed or
/// `target` falls outside `[from, to]`.
pub fn build_witness(
    pool: &CommitmentPool,
    from: usize,
    to: usize,
    target: usize,
) -> Result<MerkleWitness, TxError> {
    let capacity = constants::merkle_capacity();
    let size = pool.size();
    if from > to || to >= size || to.saturating_sub(from).saturating_add(1) > capacity {
        return Err(TxError::CmPoolRange { from, to, size });
    }
    if target < from || target > to {
        return Err(TxError::CmPoolRange {
            from: target,
            to,
            size,
        });
    }

    let mut leaves = vec![zero_cm(); capacity];
    for i in from..=to {
        if let Some(slot) = leaves.get_mut(i.saturating_sub(from)) {
            *slot = pool.get(i).ok_or(TxError::CmPoolRange { from, to, size })?;
        }
    }

    let mut level = leaves;
    let mut path = Vec::with_capacity(constants::MERKLE_DEPTH);
    let mut index_bits = Vec::with_capacity(constants::MERKLE_DEPTH);
    let mut pos = target.saturating_sub(from);

    for _ in 0..constants::MERKLE_DEPTH {
        let is_right = pos % 2 == 1;
        let sibling_pos = if is_right { pos - 1 } else { pos + 1 };
        let sibling = level
            .get(sibling_pos)
            .copied()
            .ok_or(TxError::CmPoolRange { from, to, size })?;
        path.push(sibling);
        index_bits.push(is_right);

        let mut next = Vec::with_capacity(level.len() / 2);
        for pair in level.chunks(2) {
            let Some(l) = pair.first().copied() else {
                continue;
            };
            let r = pair.get(1).copied().unwrap_or(l);
            next.push(combine(l, r));
        }
        level = next;
        pos /= 2;
    }

    let root = level
        .first()
        .copied()
        .ok_or(TxError::CmPoolRange { from, to, size })?;

    Ok(MerkleWitness {
        root,
        path,
        index_bits,
    })
}

/// Recomputes the root from a leaf and its authentication path — the
/// out-of-circuit twin of the Merkle gadget's root-recomputation
/// constraints.
#[must_use]
pub fn root_from_path(leaf: Bytes32, witness: &MerkleWitness) -> Bytes32 {
    let mut node = leaf;
    for (sibling, is_right) in witness.path.iter().zip(witness.index_bits.iter()) {
        node = if *is_right {
            combine(*sibling, node)
        } else {
            combine(node, *sibling)
        };
    }
    node
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn seeded_rng() -> XorShiftRng {
        XorShiftRng::from_seed([7u8; 16])
    }

    fn cm_at(i: u8) -> Bytes32 {
        let mut bytes = [0u8; 32];
        bytes[31] = i;
        Bytes32::from_be_bytes(bytes)
    }

    #[test]
    fn witness_reconstructs_root() {
        let mut pool = CommitmentPool::new();
        for i in 1..=6u8 {
            pool.append(cm_at(i));
        }
        let target = pool.get_index(&cm_at(3)).expect("present");
        let witness = build_witness(&pool, 0, pool.size() - 1, target).expect("valid window");
        assert_eq!(root_from_path(cm_at(3), &witness), witness.root);
    }

    #[test]
    fn window_always_contains_target_and_respects_capacity() {
        let mut rng = seeded_rng();
        let mut pool = CommitmentPool::new();
        for i in 1..=20u8 {
            pool.append(cm_at(i));
        }
        let target = pool.get_index(&cm_at(10)).expect("present");
        for _ in 0..50 {
            let (from, to) = select_window(&mut rng, pool.size(), target);
            assert!(from <= target && target <= to);
            assert!(to < pool.size());
            assert!(to - from + 1 <= constants::merkle_capacity());
        }
    }

    #[test]
    fn window_selection_is_not_deterministic() {
        let mut rng = seeded_rng();
        let mut pool = CommitmentPool::new();
        for i in 1..=20u8 {
            pool.append(cm_at(i));
        }
        let target = pool.get_index(&cm_at(10)).expect("present");
        let windows: std::collections::HashSet<_> = (0..50)
            .map(|_| select_window(&mut rng, pool.size(), target))
            .collect();
        assert!(windows.len() > 1, "windows should vary across draws");
    }

    #[test]
    fn target_outside_window_is_rejected() {
        let mut pool = CommitmentPool::new();
        for i in 1..=6u8 {
            pool.append(cm_at(i));
        }
        assert!(build_witness(&pool, 0, 2, 5).is_err());
    }

    #[test]
    fn zero_padded_window_matches_zero_cm_root() {
        let pool = CommitmentPool::new();
        let witness = build_witness(&pool, 0, 0, 0).expect("single-leaf window");
        assert_eq!(root_from_path(zero_cm(), &witness), witness.root);
        assert_eq!(witness.root, constants::zero_cm_root());
    }
}
