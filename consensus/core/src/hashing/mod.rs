use genix_hashes::HasherBase;

pub mod header;
pub mod tx;

/// Legacy serialization helpers shared by hashers and byte writers
pub(crate) trait HasherExtensions {
    /// Writes a Bitcoin-style compact size prefix
    fn write_compact_size(&mut self, len: usize) -> &mut Self;

    /// Writes the length of the bytes followed by the bytes themselves
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self;
}

impl<T: HasherBase> HasherExtensions for T {
    #[inline(always)]
    fn write_compact_size(&mut self, len: usize) -> &mut Self {
        let len = len as u64;
        match len {
            0..0xfd => self.update([len as u8]),
            0xfd..=0xffff => self.update([0xfd]).update((len as u16).to_le_bytes()),
            0x1_0000..=0xffff_ffff => self.update([0xfe]).update((len as u32).to_le_bytes()),
            _ => self.update([0xff]).update(len.to_le_bytes()),
        }
    }

    #[inline(always)]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_compact_size(bytes.len()).update(bytes)
    }
}

/// Collects serialized bytes instead of hashing them
#[derive(Default)]
pub(crate) struct ByteWriter(pub Vec<u8>);

impl HasherBase for ByteWriter {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.extend_from_slice(data.as_ref());
        self
    }
}
