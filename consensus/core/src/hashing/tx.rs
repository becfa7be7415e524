use super::{ByteWriter, HasherExtensions};
use crate::tx::{Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput};
use genix_hashes::{Hasher, HasherBase, TransactionHash};

/// Not intended for direct use by clients. Instead use `tx.id()`
pub fn id(tx: &Transaction) -> TransactionId {
    let mut hasher = TransactionHash::new();
    write_transaction(&mut hasher, tx);
    Hasher::finalize(hasher)
}

/// Returns the legacy wire serialization of the transaction
pub fn serialize(tx: &Transaction) -> Vec<u8> {
    let mut writer = ByteWriter::default();
    write_transaction(&mut writer, tx);
    writer.0
}

fn write_transaction<T: HasherBase>(hasher: &mut T, tx: &Transaction) {
    hasher.update(tx.version.to_le_bytes()).write_compact_size(tx.inputs.len());
    for input in tx.inputs.iter() {
        write_input(hasher, input);
    }

    hasher.write_compact_size(tx.outputs.len());
    for output in tx.outputs.iter() {
        write_output(hasher, output);
    }

    hasher.update(tx.lock_time.to_le_bytes());
}

#[inline(always)]
fn write_input<T: HasherBase>(hasher: &mut T, input: &TransactionInput) {
    write_outpoint(hasher, &input.previous_outpoint);
    hasher.write_var_bytes(&input.signature_script).update(input.sequence.to_le_bytes());
}

#[inline(always)]
fn write_outpoint<T: HasherBase>(hasher: &mut T, outpoint: &TransactionOutpoint) {
    hasher.update(outpoint.transaction_id).update(outpoint.index.to_le_bytes());
}

#[inline(always)]
fn write_output<T: HasherBase>(hasher: &mut T, output: &TransactionOutput) {
    hasher.update(output.value.to_le_bytes()).write_var_bytes(&output.script_public_key);
}
