//! Digest helpers used by vendor signatures.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// `md5(k1=v1k2=v2... + secret)` over parameters sorted by key, with raw
/// (not percent-encoded) values and without the `sign` field itself.
pub fn sorted_params_md5(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut plain = String::new();
    for (k, v) in params.iter().filter(|(k, _)| k.as_str() != "sign") {
        plain.push_str(k);
        plain.push('=');
        plain.push_str(v);
    }
    plain.push_str(secret);
    md5_hex(&plain)
}
