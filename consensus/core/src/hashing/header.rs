use super::ByteWriter;
use crate::header::{HEADER_SIZE, Header};
use genix_hashes::{BlockHash, Hash, Hasher, HasherBase};

/// Returns the header hash (X11 over the 80-byte serialization).
pub fn hash(header: &Header) -> Hash {
    let mut hasher = BlockHash::new();
    write_header(&mut hasher, header);
    Hasher::finalize(hasher)
}

pub fn serialize(header: &Header) -> [u8; HEADER_SIZE] {
    let mut writer = ByteWriter(Vec::with_capacity(HEADER_SIZE));
    write_header(&mut writer, header);
    let mut out = [0u8; HEADER_SIZE];
    out.copy_from_slice(&writer.0);
    out
}

fn write_header<T: HasherBase>(hasher: &mut T, header: &Header) {
    hasher
        .update(header.version.to_le_bytes())
        .update(header.prev_block_hash)
        .update(header.hash_merkle_root)
        .update(header.timestamp.to_le_bytes())
        .update(header.bits.to_le_bytes())
        .update(header.nonce.to_le_bytes());
}
