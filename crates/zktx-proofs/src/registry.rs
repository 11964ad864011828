//! Process-wide registry of active proof handles (`§5`).
//!
//! Each handle owns its own lazily-loaded, cached proving/verifying key,
//! mirroring the reference implementation's "process-wide registry of
//! active proof façades... creation and destruction are not thread-safe
//! (the caller synchronizes)". The `Mutex` gives the map itself
//! bookkeeping safety; it does not make concurrent use of a single
//! handle safe — that exclusion remains the caller's responsibility.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use bellman::groth16::{VerifyingKey, prepare_verifying_key};
use bls12_381::Bls12;
use rand::RngCore;
use rand::rngs::OsRng;

use zktx_core::Bytes32;
use zktx_core::constants::N_IN;
use zktx_pool::CommitmentPool;

use crate::params::{self, TxParameters};
use crate::prover;
use crate::types::TxData;
use crate::verifier;

/// One active proving/verifying instance, keyed by a CSPRNG handle name.
///
/// Keys are loaded on first use and cached for the handle's lifetime,
/// per the façade's "cache per-instance on first use, reuse thereafter"
/// policy.
#[derive(Default)]
pub struct ProofHandle {
    params: Option<TxParameters>,
    vk: Option<VerifyingKey<Bls12>>,
    /// Whether the proving key has been loaded into this handle.
    pub is_pk_loaded: bool,
    /// Whether the verifying key has been loaded into this handle.
    pub is_vk_loaded: bool,
}

fn registry() -> &'static Mutex<HashMap<Bytes32, ProofHandle>> {
    static REGISTRY: OnceLock<Mutex<HashMap<Bytes32, ProofHandle>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn fresh_handle_name(existing: &HashMap<Bytes32, ProofHandle>) -> Bytes32 {
    loop {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let candidate = Bytes32::from_be_bytes(bytes);
        if !existing.contains_key(&candidate) {
            return candidate;
        }
    }
}

/// Creates a new, empty proof handle and returns its CSPRNG name.
///
/// # Panics
/// Panics if the registry mutex was poisoned by a prior panic while
/// held.
#[must_use]
pub fn create_handle() -> Bytes32 {
    let mut guard = registry().lock().expect("registry mutex poisoned");
    let name = fresh_handle_name(&guard);
    guard.insert(name, ProofHandle::default());
    name
}

/// Destroys a proof handle, releasing its cached keys.
///
/// Returns `false` if `handle` was not live.
///
/// # Panics
/// Panics if the registry mutex was poisoned by a prior panic while
/// held.
pub fn destroy_handle(handle: Bytes32) -> bool {
    let mut guard = registry().lock().expect("registry mutex poisoned");
    guard.remove(&handle).is_some()
}

/// Reports whether `handle`'s proving/verifying keys are currently
/// cached. Returns `None` if `handle` is not live.
///
/// # Panics
/// Panics if the registry mutex was poisoned by a prior panic while
/// held.
#[must_use]
pub fn handle_status(handle: Bytes32) -> Option<(bool, bool)> {
    let guard = registry().lock().expect("registry mutex poisoned");
    guard.get(&handle).map(|entry| (entry.is_pk_loaded, entry.is_vk_loaded))
}

/// Proves through `handle`, loading and caching the proving key from
/// `proving_key_path` on first use.
///
/// Returns a failed [`TxData`] (never panics) if `handle` is unknown or
/// the proving key cannot be loaded.
///
/// # Panics
/// Panics if the registry mutex was poisoned by a prior panic while
/// held.
#[allow(
    clippy::too_many_arguments,
    reason = "mirrors the reference Tx1To1API::prove signature"
)]
pub fn prove(
    handle: Bytes32,
    proving_key_path: &Path,
    pool: &CommitmentPool,
    ask: Bytes32,
    vpub_old: u64,
    v: [u64; N_IN],
    r: [Bytes32; N_IN],
    zero_cm: [bool; N_IN],
    peer_apk: Bytes32,
    vpub_new: u64,
    r_v: u64,
    g: Bytes32,
    gpk: Bytes32,
) -> TxData {
    let mut guard = registry().lock().expect("registry mutex poisoned");
    let Some(entry) = guard.get_mut(&handle) else {
        return TxData::failed(1, "unknown proof handle");
    };

    if !entry.is_pk_loaded {
        match params::load_parameters(proving_key_path, true) {
            Ok(loaded) => {
                entry.params = Some(loaded);
                entry.is_pk_loaded = true;
            }
            Err(err) => return TxData::failed(1, err.to_string()),
        }
    }

    let params = entry.params.as_ref().expect("just loaded or already cached above");
    prover::prove(params, pool, ask, vpub_old, v, r, zero_cm, peer_apk, vpub_new, r_v, g, gpk)
}

/// Verifies through `handle`, loading and caching the verifying key from
/// `verifying_key_path` on first use.
///
/// Returns `false` (never panics) if `handle` is unknown, the verifying
/// key cannot be loaded, or the bundle fails verification.
///
/// # Panics
/// Panics if the registry mutex was poisoned by a prior panic while
/// held.
pub fn verify(handle: Bytes32, verifying_key_path: &Path, bundle: &TxData) -> bool {
    let mut guard = registry().lock().expect("registry mutex poisoned");
    let Some(entry) = guard.get_mut(&handle) else {
        return false;
    };

    if !entry.is_vk_loaded {
        let Ok(vk) = params::load_verifying_key(verifying_key_path) else {
            return false;
        };
        entry.vk = Some(vk);
        entry.is_vk_loaded = true;
    }

    let Some(vk) = entry.vk.as_ref() else {
        return false;
    };
    let pvk = prepare_verifying_key(vk);
    verifier::verify(&pvk, bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_handle_fails_cleanly() {
        let handle = Bytes32::from_be_bytes([0xAB; 32]);
        let bundle = prove(
            handle,
            Path::new("/nonexistent/pk.bin"),
            &CommitmentPool::new(),
            Bytes32::ZERO,
            0,
            [0, 0],
            [Bytes32::ZERO, Bytes32::ZERO],
            [true, true],
            Bytes32::ZERO,
            0,
            0,
            zktx_core::constants::default_g(),
            zktx_core::constants::default_g(),
        );
        assert_ne!(bundle.error_code, 0);
    }

    #[test]
    fn create_destroy_round_trips() {
        let handle = create_handle();
        assert_eq!(handle_status(handle), Some((false, false)));
        assert!(destroy_handle(handle));
        assert_eq!(handle_status(handle), None);
        assert!(!destroy_handle(handle));
    }

    #[test]
    fn missing_key_file_fails_without_caching() {
        let handle = create_handle();
        let missing = Path::new("/nonexistent/pk.bin");
        let bundle = prove(
            handle,
            missing,
            &CommitmentPool::new(),
            Bytes32::ZERO,
            0,
            [0, 0],
            [Bytes32::ZERO, Bytes32::ZERO],
            [true, true],
            Bytes32::ZERO,
            0,
            0,
            zktx_core::constants::default_g(),
            zktx_core::constants::default_g(),
        );
        assert_ne!(bundle.error_code, 0);
        assert_eq!(handle_status(handle), Some((false, false)));
        destroy_handle(handle);
    }
}
