//! Loads a commitment pool from a JSON file: a flat array of 64-character
//! hex commitment strings, appended in file order onto a freshly seeded
//! [`CommitmentPool`] (which already carries `ZERO_CM` at position 0, per
//! `zktx_pool::pool`'s documented convention).

use std::path::Path;

use zktx_core::Bytes32;
use zktx_pool::CommitmentPool;

use super::CliError;

/// Reads `path` as a JSON array of hex commitment strings and appends
/// each one, in order, to a fresh pool.
///
/// # Errors
/// Returns [`CliError::Io`] if the file cannot be read, [`CliError::Json`]
/// if it is not a JSON string array, or [`CliError::Tx`] if an entry is
/// not valid hex.
pub fn load_pool(path: &Path) -> Result<CommitmentPool, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let entries: Vec<String> = serde_json::from_str(&contents)?;

    let mut pool = CommitmentPool::new();
    for (i, entry) in entries.iter().enumerate() {
        let cm = Bytes32::from_hex(&format!("pool[{i}]"), entry)?;
        pool.append(cm);
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_pool_seeded_with_zero_cm() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pool.json");
        std::fs::write(&path, r#"["00", "11"]"#).expect("write");

        let pool = load_pool(&path).expect("loads");
        // ZERO_CM at 0, then the two entries.
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn rejects_non_hex_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pool.json");
        std::fs::write(&path, r#"["zz"]"#).expect("write");

        assert!(load_pool(&path).is_err());
    }
}
