//! Ident string exposed to upstreams (spec §6): a stable, opaque identifier
//! per user that leaks no metadata, used to satisfy identd lookups.

use sha2::{Digest, Sha256};

/// First 16 bytes of `SHA-256(LE64(userID))`, hex-encoded.
pub fn user_ident(user_id: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.to_le_bytes());
    let digest = hasher.finalize();
    digest[..16]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
