use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// SHA-256 of the captured image bytes.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Content-addressed location for a capture's export.
/// Layout: `<base>/<first_2_hex_chars>/msds-<full_hex>.<ext>`
///
/// A digest shorter than two characters is used whole as the shard directory.
pub fn export_path(output_dir: &Path, hash_hex: &str, ext: &str) -> PathBuf {
    let shard = hash_hex.get(..2).unwrap_or(hash_hex);
    output_dir
        .join(shard)
        .join(format!("msds-{hash_hex}.{ext}"))
}
