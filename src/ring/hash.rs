//! Hash function shared by ring positions and lookup keys.

/// Signature of a function placing bytes on the 32-bit ring.
pub type HashFn = fn(&[u8]) -> u32;

/// CRC-32 (IEEE) checksum of `key`.
pub fn crc32(key: &[u8]) -> u32 {
    crc32fast::hash(key)
}

/// Builds the key hashed for the `index`-th virtual position of a node.
pub fn position_key(address: &str, weight: u32, index: u64, id: u64) -> String {
    format!("{}*{}-{}-{}", address, weight, index, id)
}
