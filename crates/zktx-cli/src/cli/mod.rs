//! Command-line interface for the `zktx` binary: a thin façade over
//! [`zktx_proofs`]'s `setup` / `generate` / `prove` / `verify` /
//! `decrypt_tx_info` entry points (`C12`, `§4.12`), plus the `ZkgTool`-derived
//! key-derivation helpers. Every subcommand marshals strings to the typed
//! values the façade consumes and back; it adds no logic of its own.
#![allow(clippy::print_stdout, reason = "CLI subcommands report results to stdout")]

mod pool_file;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zktx_core::Bytes32;
use zktx_core::constants::{N_IN, N_OUT, default_g};
use zktx_proofs::{TxData, TxGovInfo};

pub use pool_file::load_pool;

/// Errors surfaced at the CLI boundary: I/O, JSON transport, and every
/// [`zktx_core::TxError`] / [`zktx_proofs::ProofError`] the façade raises.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failure reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure (de)serializing a `TxData`/`TxGovInfo` JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A scalar/pool/transport failure from the shared vocabulary crate.
    #[error(transparent)]
    Tx(#[from] zktx_core::TxError),
    /// A parameter-generation or key-I/O failure from the façade crate.
    #[error(transparent)]
    Proof(#[from] zktx_proofs::ProofError),
}

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "zktx")]
#[command(about = "Shielded two-input/two-output transfer circuit façade")]
pub struct Cli {
    /// Top-level subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initializes curve parameters. Idempotent; present for parity with
    /// the façade's `setup()` entry point, which has nothing left to do
    /// once the curve (`bls12_381`) is chosen at compile time.
    Setup,
    /// Builds the `(2,2)` transaction circuit once and persists a fresh
    /// Groth16 proving/verifying key pair.
    Generate(GenerateArgs),
    /// Proves a `(2,2)` shielded transfer against a commitment pool.
    Prove(ProveArgs),
    /// Verifies a transaction bundle against a verifying key.
    Verify(VerifyArgs),
    /// Decrypts a transaction bundle's governance ciphertext.
    Decrypt(DecryptArgs),
    /// Key-derivation and validation helpers.
    Keygen {
        /// Keygen subcommand.
        #[command(subcommand)]
        command: KeygenCommands,
    },
}

/// Arguments for `zktx generate`.
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Output file for the proving key.
    #[arg(long, default_value = "pk.data")]
    pub pk_out: PathBuf,
    /// Output file for the verifying key.
    #[arg(long, default_value = "vk.data")]
    pub vk_out: PathBuf,
}

/// Arguments for `zktx prove`.
#[derive(Debug, clap::Args)]
#[allow(clippy::struct_field_names, reason = "field names mirror the façade's prove() parameter names")]
pub struct ProveArgs {
    /// Path to the proving key produced by `zktx generate`.
    #[arg(long)]
    pub pk: PathBuf,
    /// Path to a JSON array of 64-hex-character commitments forming the
    /// commitment pool (position 0, `ZERO_CM`, is seeded automatically).
    #[arg(long)]
    pub pool: PathBuf,
    /// Spend authority secret key, 64 hex characters.
    #[arg(long)]
    pub ask: String,
    /// Transparent value entering the shielded set.
    #[arg(long, default_value_t = 0)]
    pub vpub_old: u64,
    /// Value of input note 0.
    #[arg(long)]
    pub v0: u64,
    /// Value of input note 1.
    #[arg(long)]
    pub v1: u64,
    /// Randomness of input note 0, 64 hex characters.
    #[arg(long)]
    pub r0: String,
    /// Randomness of input note 1, 64 hex characters.
    #[arg(long)]
    pub r1: String,
    /// Treat input 0 as a zero-valued placeholder, bypassing Merkle
    /// membership (the zero-value escape, `§4.8`).
    #[arg(long)]
    pub zero0: bool,
    /// Treat input 1 as a zero-valued placeholder.
    #[arg(long)]
    pub zero1: bool,
    /// Recipient's `apk`, 64 hex characters.
    #[arg(long)]
    pub peer_apk: String,
    /// Transparent value leaving the shielded set.
    #[arg(long, default_value_t = 0)]
    pub vpub_new: u64,
    /// Value paid to `peer_apk`; the remainder becomes the payer's change.
    #[arg(long)]
    pub r_v: u64,
    /// ElGamal generator, 64 hex characters with leading nibble `3`.
    #[arg(long, default_value_t = default_g().to_hex())]
    pub g: String,
    /// Overseer's ElGamal public key, 64 hex characters.
    #[arg(long)]
    pub gpk: String,
    /// Output file for the resulting `TxData` bundle, as JSON.
    #[arg(long, default_value = "tx-data.json")]
    pub out: PathBuf,
}

/// Arguments for `zktx verify`.
#[derive(Debug, clap::Args)]
pub struct VerifyArgs {
    /// Path to the verifying key produced by `zktx generate`.
    #[arg(long)]
    pub vk: PathBuf,
    /// Path to a `TxData` bundle, as JSON (produced by `zktx prove`).
    #[arg(long)]
    pub input: PathBuf,
}

/// Arguments for `zktx decrypt`.
#[derive(Debug, clap::Args)]
pub struct DecryptArgs {
    /// Overseer's ElGamal secret key, 64 hex characters.
    #[arg(long)]
    pub gsk: String,
    /// Path to a `TxData` bundle, as JSON; only its `g_data` field is read.
    #[arg(long)]
    pub input: PathBuf,
}

/// Key-derivation subcommands.
#[derive(Debug, Subcommand)]
pub enum KeygenCommands {
    /// Derives `apk = PRF(ask)` from a spend authority secret key.
    Apk {
        /// Spend authority secret key, 64 hex characters.
        #[arg(long)]
        ask: String,
    },
    /// Derives `Gpk = g^Gsk` from an overseer secret key.
    Gpk {
        /// Overseer secret key, 64 hex characters.
        #[arg(long)]
        gsk: String,
        /// ElGamal generator; defaults to `DEFAULT_G` when omitted.
        #[arg(long)]
        generator: Option<String>,
    },
}

/// Runs `zktx setup`: idempotent curve initialization.
pub fn run_setup() {
    tracing::debug!("setup: bls12_381 curve parameters require no runtime initialization");
    println!("setup complete (bls12_381, no persistent state)");
}

/// Runs `zktx generate`: builds the circuit once and persists a fresh key pair.
///
/// # Errors
/// Returns [`CliError::Proof`] if circuit synthesis or key generation
/// fails, [`CliError::Io`] if either output file cannot be written.
pub fn run_generate(args: &GenerateArgs) -> Result<(), CliError> {
    tracing::debug!(pk_out = %args.pk_out.display(), vk_out = %args.vk_out.display(), "generate: start");
    let params = zktx_proofs::generate_parameters()?;
    zktx_proofs::save_parameters(&params, &args.pk_out, &args.vk_out)?;
    tracing::debug!("generate: done");
    println!(
        "wrote proving key to {} and verifying key to {}",
        args.pk_out.display(),
        args.vk_out.display()
    );
    Ok(())
}

/// Runs `zktx prove`: builds a `(2,2)` transfer and writes its `TxData`
/// bundle to `args.out` as JSON, regardless of whether proving succeeded
/// (per the façade's catch-everything `error_code`/`description` policy —
/// a failed bundle is still valid JSON, just with `error_code != 0`).
///
/// # Errors
/// Returns [`CliError::Tx`] if a hex scalar is malformed,
/// [`CliError::Proof`] if the proving key cannot be loaded,
/// [`CliError::Io`]/[`CliError::Json`] for the pool/output files.
pub fn run_prove(args: &ProveArgs) -> Result<(), CliError> {
    let pool = load_pool(&args.pool)?;
    let ask = Bytes32::from_hex("ask", &args.ask)?;
    let r0 = Bytes32::from_hex("r0", &args.r0)?;
    let r1 = Bytes32::from_hex("r1", &args.r1)?;
    let peer_apk = Bytes32::from_hex("peer_apk", &args.peer_apk)?;
    let g = Bytes32::from_hex("g", &args.g)?;
    let gpk = Bytes32::from_hex("Gpk", &args.gpk)?;

    let params = zktx_proofs::load_parameters(&args.pk, true)?;

    tracing::debug!(pool_size = pool.size(), "prove: start");
    let bundle = zktx_proofs::prove(
        &params,
        &pool,
        ask,
        args.vpub_old,
        [args.v0, args.v1],
        [r0, r1],
        [args.zero0, args.zero1],
        peer_apk,
        args.vpub_new,
        args.r_v,
        g,
        gpk,
    );

    if bundle.error_code == 0 {
        tracing::debug!("prove: succeeded");
    } else {
        tracing::warn!(description = %bundle.description, "prove: failed");
    }

    write_json(&args.out, &bundle)?;
    println!(
        "error_code={} description={:?} -> {}",
        bundle.error_code,
        bundle.description,
        args.out.display()
    );
    Ok(())
}

/// Runs `zktx verify`: prints `true`/`false` and exits `1` on `false`,
/// matching the façade's "verify returns false on any error" policy —
/// there is no separate error path to report here.
///
/// # Errors
/// Returns [`CliError::Proof`] if the verifying key cannot be loaded,
/// [`CliError::Io`]/[`CliError::Json`] if the bundle cannot be read.
pub fn run_verify(args: &VerifyArgs) -> Result<bool, CliError> {
    let vk = zktx_proofs::load_verifying_key(&args.vk)?;
    let pvk = bellman::groth16::prepare_verifying_key(&vk);
    let bundle: TxData = read_json(&args.input)?;

    let ok = zktx_proofs::verify(&pvk, &bundle);
    println!("{ok}");
    Ok(ok)
}

/// Runs `zktx decrypt`: decrypts `input`'s `g_data` field under `gsk` and
/// prints the recovered [`TxGovInfo`] as JSON.
///
/// # Errors
/// Returns [`CliError::Io`]/[`CliError::Json`] if the bundle cannot be read.
pub fn run_decrypt(args: &DecryptArgs) -> Result<TxGovInfo, CliError> {
    let bundle: TxData = read_json(&args.input)?;
    let info = zktx_proofs::decrypt_tx_info(&args.gsk, &bundle.g_data);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(info)
}

/// Runs `zktx keygen apk`.
///
/// # Errors
/// Returns [`CliError::Tx`] if `ask` is not valid hex.
pub fn run_keygen_apk(ask: &str) -> Result<Bytes32, CliError> {
    let ask = Bytes32::from_hex("ask", ask)?;
    let apk = zktx_proofs::generate_apk(ask);
    println!("{}", apk.to_hex());
    Ok(apk)
}

/// Runs `zktx keygen gpk`.
///
/// # Errors
/// Returns [`CliError::Tx`] if `gsk` or `generator` is not valid hex.
pub fn run_keygen_gpk(gsk: &str, generator: Option<&str>) -> Result<Bytes32, CliError> {
    let gsk = Bytes32::from_hex("Gsk", gsk)?;
    let generator = generator.map(|g| Bytes32::from_hex("generator", g)).transpose()?;
    let gpk = zktx_proofs::generate_gpk(gsk, generator);
    println!("{}", gpk.to_hex());
    Ok(gpk)
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
