//! The transaction gadget (`C11`): the top-level `(2,2)` shielded
//! transfer circuit. Allocates the public-input bit buffer in the exact
//! order `§4.11` fixes, composes two input-note gadgets, two
//! output-note gadgets and the governance gadget, and enforces value
//! balance plus the 64-bit overflow guard.
//!
//! The circuit is fixed at `N_IN = N_OUT = 2` ([`zktx_core::constants::N_IN`]
//! / [`N_OUT`](zktx_core::constants::N_OUT)) rather than generic over
//! `(N_in, N_out)`: the façade's `(2,2)` proof/verify API (`§6`, `§9`)
//! only ever instantiates this one shape, and a concrete circuit avoids
//! the const-generic plumbing a truly generic gadget would need through
//! `bellman`'s `Circuit` trait.

use bellman::gadgets::boolean::Boolean;
use bellman::{Circuit, ConstraintSystem, SynthesisError};
use bls12_381::Scalar;

use zktx_core::constants::{MERKLE_DEPTH, N_IN, N_OUT};

use crate::bit_utils::{alloc_bytes32_bits, alloc_u64_bits};
use crate::binary_gadget::{bits_to_num, multipack_and_inputize};
use crate::governance::{self, NoteBits};
use crate::input_note::{self, InputNoteWitness};
use crate::output_note::{self, OutputNoteWitness};

/// Witness for one output note. `apk` is resolved by the caller before
/// the circuit is built — the payer's own key for a change output, a
/// peer's for a payment — the gadget treats both symmetrically.
#[derive(Debug, Clone)]
pub struct OutputWitness {
    /// Recipient's `apk`.
    pub apk: Option<[u8; 32]>,
    /// Note value.
    pub v: Option<u64>,
    /// Fresh randomness for the note commitment.
    pub r: Option<[u8; 32]>,
}

/// The `(2,2)` shielded transfer circuit.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Input-note witnesses (`N_IN` entries).
    pub inputs: Vec<InputNoteWitness>,
    /// Merkle roots, one per input, matching `inputs` positionally.
    pub rts: Vec<Option<[u8; 32]>>,
    /// Serial numbers, one per input.
    pub sns: Vec<Option<[u8; 32]>>,
    /// Output-note witnesses (`N_OUT` entries).
    pub outputs: Vec<OutputWitness>,
    /// Transparent value entering the shielded set.
    pub vpub_old: Option<u64>,
    /// Transparent value leaving the shielded set.
    pub vpub_new: Option<u64>,
    /// ElGamal generator.
    pub g: Option<[u8; 32]>,
    /// Overseer's ElGamal public key.
    pub gpk: Option<[u8; 32]>,
    /// Fresh ElGamal randomness, sampled once per transaction.
    pub y: Option<[u8; 32]>,
}

impl Transaction {
    /// An all-`None` circuit of the right shape, for parameter
    /// generation (`setup`/`generate`).
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            inputs: (0..N_IN).map(|_| InputNoteWitness::unknown(MERKLE_DEPTH)).collect(),
            rts: vec![None; N_IN],
            sns: vec![None; N_IN],
            outputs: (0..N_OUT)
                .map(|_| OutputWitness {
                    apk: None,
                    v: None,
                    r: None,
                })
                .collect(),
            vpub_old: None,
            vpub_new: None,
            g: None,
            gpk: None,
            y: None,
        }
    }
}

impl Circuit<Scalar> for Transaction {
    #[allow(clippy::too_many_lines)]
    fn synthesize<CS: ConstraintSystem<Scalar>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
        assert_eq!(self.inputs.len(), N_IN, "circuit is fixed at N_IN inputs");
        assert_eq!(self.rts.len(), N_IN, "one root per input");
        assert_eq!(self.sns.len(), N_IN, "one serial number per input");
        assert_eq!(self.outputs.len(), N_OUT, "circuit is fixed at N_OUT outputs");

        let mut public_bits: Vec<Boolean> = Vec::new();

        // §4.11 step 2, inputs: rt_i, sn_i, in that order per input.
        let mut rt_bits_per_input = Vec::with_capacity(N_IN);
        let mut sn_bits_per_input = Vec::with_capacity(N_IN);
        for (i, (rt, sn)) in self.rts.iter().zip(self.sns.iter()).enumerate() {
            let rt_bits = alloc_bytes32_bits(cs.namespace(|| format!("rt_{i}")), *rt)?;
            let sn_bits = alloc_bytes32_bits(cs.namespace(|| format!("sn_{i}")), *sn)?;
            public_bits.extend_from_slice(&rt_bits);
            public_bits.extend_from_slice(&sn_bits);
            rt_bits_per_input.push(rt_bits);
            sn_bits_per_input.push(sn_bits);
        }

        let mut input_outputs = Vec::with_capacity(N_IN);
        for (i, ((witness, rt_bits), sn_bits)) in self
            .inputs
            .iter()
            .zip(rt_bits_per_input.iter())
            .zip(sn_bits_per_input.iter())
            .enumerate()
        {
            let output = input_note::synthesize(
                cs.namespace(|| format!("input note {i}")),
                rt_bits,
                sn_bits,
                witness,
            )?;
            input_outputs.push(output);
        }

        // §4.11 step 2, outputs: cm_j, produced by the output-note gadget
        // itself and appended straight to the public buffer — there is
        // no separate public witness to reconcile it against.
        let mut output_outputs = Vec::with_capacity(N_OUT);
        for (j, witness) in self.outputs.iter().enumerate() {
            let apk_bits = alloc_bytes32_bits(cs.namespace(|| format!("output {j} apk")), witness.apk)?;
            let output = output_note::synthesize(
                cs.namespace(|| format!("output note {j}")),
                &apk_bits,
                &OutputNoteWitness {
                    v: witness.v,
                    r: witness.r,
                },
            )?;
            public_bits.extend_from_slice(&output.cm_bits);
            output_outputs.push((apk_bits, output));
        }

        let vpub_old_bits = alloc_u64_bits(cs.namespace(|| "vpub_old"), self.vpub_old)?;
        let vpub_new_bits = alloc_u64_bits(cs.namespace(|| "vpub_new"), self.vpub_new)?;
        public_bits.extend_from_slice(&vpub_old_bits);
        public_bits.extend_from_slice(&vpub_new_bits);

        let g_bits = alloc_bytes32_bits(cs.namespace(|| "g"), self.g)?;
        let gpk_bits = alloc_bytes32_bits(cs.namespace(|| "Gpk"), self.gpk)?;
        public_bits.extend_from_slice(&g_bits);
        public_bits.extend_from_slice(&gpk_bits);

        let g_num = bits_to_num(cs.namespace(|| "pack g"), &g_bits)?;
        let gpk_num = bits_to_num(cs.namespace(|| "pack Gpk"), &gpk_bits)?;
        let y_bits = alloc_bytes32_bits(cs.namespace(|| "y"), self.y)?;
        let y_num = bits_to_num(cs.namespace(|| "pack y"), &y_bits)?;

        let vpub_old_num = bits_to_num(cs.namespace(|| "pack vpub_old"), &vpub_old_bits)?;
        let vpub_new_num = bits_to_num(cs.namespace(|| "pack vpub_new"), &vpub_new_bits)?;

        // Value balance: vpub_old + Σ v_in = vpub_new + Σ v_out. Packing
        // each 64-bit value into a field element and comparing linear
        // combinations directly is sound here because the field modulus
        // (~2^254) is vastly larger than any sum of a handful of 64-bit
        // values (~2^67 at most); no bit-level carry chain is needed.
        cs.enforce(
            || "value balance",
            |lc| {
                let mut lc = lc + vpub_old_num.get_variable();
                for output in &input_outputs {
                    lc = lc + output.v_num.get_variable();
                }
                lc
            },
            |lc| lc + CS::one(),
            |lc| {
                let mut lc = lc + vpub_new_num.get_variable();
                for (_, output) in &output_outputs {
                    lc = lc + output.v_num.get_variable();
                }
                lc
            },
        );

        // Overflow guard: the same sum is also witnessed as a fresh
        // 64-bit boolean array, so a sum that silently wrapped past 64
        // bits (and so no longer matches the witnessed bits) fails to
        // satisfy the circuit rather than passing unnoticed.
        let total_value = self.vpub_old.and_then(|vpub_old| {
            self.inputs
                .iter()
                .try_fold(vpub_old, |acc, input| input.v.and_then(|v| acc.checked_add(v)))
        });
        let total_bits = alloc_u64_bits(cs.namespace(|| "total_uint64"), total_value)?;
        let total_num = bits_to_num(cs.namespace(|| "pack total_uint64"), &total_bits)?;
        cs.enforce(
            || "overflow guard",
            |lc| {
                let mut lc = lc + vpub_old_num.get_variable();
                for output in &input_outputs {
                    lc = lc + output.v_num.get_variable();
                }
                lc
            },
            |lc| lc + CS::one(),
            |lc| lc + total_num.get_variable(),
        );

        // Governance gadget, composed last so it can reference every
        // note's allocated bits.
        let in_notes: Vec<NoteBits<'_>> = input_outputs
            .iter()
            .map(|output| NoteBits {
                apk_bits: &output.apk_bits,
                v_bits: &output.v_bits,
            })
            .collect();
        let out_notes: Vec<NoteBits<'_>> = output_outputs
            .iter()
            .map(|(apk_bits, output)| NoteBits {
                apk_bits,
                v_bits: &output.v_bits,
            })
            .collect();

        let ciphertext = governance::synthesize(
            cs.namespace(|| "governance"),
            &vpub_old_bits,
            &in_notes,
            &vpub_new_bits,
            &out_notes,
            &g_num,
            &gpk_num,
            &y_num,
        )?;
        public_bits.extend_from_slice(&ciphertext.c1_bits);
        public_bits.extend_from_slice(&ciphertext.c2_bits);

        multipack_and_inputize(cs.namespace(|| "multipack public inputs"), &public_bits)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bellman::gadgets::test::TestConstraintSystem;
    use zktx_core::Bytes32;
    use zktx_core::constants::default_g;
    use zktx_pool::{CommitmentPool, build_witness};

    use super::*;

    fn scalar(byte: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        bytes
    }

    #[test]
    fn zero_value_transaction_is_satisfiable() {
        // Both inputs zero-value (escape the membership check); output
        // values balance vpub_old == vpub_new.
        let zero_note = InputNoteWitness {
            ask: Some([0u8; 32]),
            r: Some([0u8; 32]),
            v: Some(0),
            path: vec![Some((zktx_core::constants::zero_cm().to_be_bytes(), false)); MERKLE_DEPTH],
        };
        let rt = zktx_core::constants::zero_cm_root().to_be_bytes();
        let sn = crate::note_calc::serial_number(Bytes32::ZERO, Bytes32::ZERO).to_be_bytes();

        let circuit = Transaction {
            inputs: vec![zero_note.clone(), zero_note],
            rts: vec![Some(rt), Some(rt)],
            sns: vec![Some(sn), Some(sn)],
            outputs: vec![
                OutputWitness {
                    apk: Some(scalar(9)),
                    v: Some(0),
                    r: Some(scalar(10)),
                },
                OutputWitness {
                    apk: Some(scalar(11)),
                    v: Some(0),
                    r: Some(scalar(12)),
                },
            ],
            vpub_old: Some(5),
            vpub_new: Some(5),
            g: Some(default_g().to_be_bytes()),
            gpk: Some(default_g().to_be_bytes()),
            y: Some(scalar(42)),
        };

        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit.synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }

    #[test]
    fn spending_a_real_note_balances_and_satisfies() {
        let mut pool = CommitmentPool::new();
        let ask = scalar(2);
        let r = scalar(1);
        let v = 10u64;
        let apk = Bytes32::from_be_bytes(zktx_core::hash::compress_pair(&ask, &ask));
        let cm = crate::note_calc::commitment(apk, v, Bytes32::from_be_bytes(r));
        for i in 1..=6u8 {
            if i == 3 {
                pool.append(cm);
            } else {
                pool.append(Bytes32::from_be_bytes(scalar(i)));
            }
        }
        let target = pool.get_index(&cm).expect("present");
        let merkle_witness = build_witness(&pool, 0, pool.size() - 1, target).expect("window");
        let sn = crate::note_calc::serial_number(Bytes32::from_be_bytes(ask), Bytes32::from_be_bytes(r));

        let spending_note = InputNoteWitness {
            ask: Some(ask),
            r: Some(r),
            v: Some(v),
            path: merkle_witness
                .path
                .iter()
                .zip(merkle_witness.index_bits.iter())
                .map(|(sibling, is_right)| Some((sibling.to_be_bytes(), *is_right)))
                .collect(),
        };
        let zero_note = InputNoteWitness {
            ask: Some([0u8; 32]),
            r: Some([0u8; 32]),
            v: Some(0),
            path: vec![Some((zktx_core::constants::zero_cm().to_be_bytes(), false)); MERKLE_DEPTH],
        };
        let zero_sn = crate::note_calc::serial_number(Bytes32::ZERO, Bytes32::ZERO).to_be_bytes();
        let zero_rt = zktx_core::constants::zero_cm_root().to_be_bytes();

        let change_apk = scalar(3);
        let circuit = Transaction {
            inputs: vec![spending_note, zero_note],
            rts: vec![Some(merkle_witness.root.to_be_bytes()), Some(zero_rt)],
            sns: vec![Some(sn.to_be_bytes()), Some(zero_sn)],
            outputs: vec![
                OutputWitness {
                    apk: Some(scalar(20)),
                    v: Some(4),
                    r: Some(scalar(21)),
                },
                OutputWitness {
                    apk: Some(change_apk),
                    v: Some(6),
                    r: Some(scalar(22)),
                },
            ],
            vpub_old: Some(0),
            vpub_new: Some(0),
            g: Some(default_g().to_be_bytes()),
            gpk: Some(default_g().to_be_bytes()),
            y: Some(scalar(7)),
        };

        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit.synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }
}
