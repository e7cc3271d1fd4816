//! Chromium's on-disk cookie value cipher (Linux variant).
//!
//! Every constant here is a fixed protocol of the browser, required for
//! byte compatibility with its `encrypted_value` column: PBKDF2-HMAC-SHA1
//! over the literal password "peanuts" and salt "saltysalt" with a single
//! iteration, AES-128-CBC with an all-space IV, PKCS#7 padding, and a
//! 3-byte `v10` version tag in front of the ciphertext. This is an
//! obfuscation layer the browser applies locally, not a security boundary.

use std::sync::LazyLock;

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use trackcheck_core::errors::{HarnessError, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const PASSWORD: &[u8] = b"peanuts";
const SALT: &[u8] = b"saltysalt";
const ITERATIONS: u32 = 1;
const KEY_LEN: usize = 16;
const BLOCK: usize = 16;
const IV: [u8; BLOCK] = [b' '; BLOCK];
const VERSION_TAG: &[u8] = b"v10";

static KEY: LazyLock<[u8; KEY_LEN]> = LazyLock::new(|| {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha1>(PASSWORD, SALT, ITERATIONS, &mut key);
    key
});

/// Encrypt a plaintext cookie value into the `encrypted_value` format.
/// Padding is applied manually so the bytes match the browser exactly.
pub fn encrypt(plaintext: &str) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(HarnessError::InvalidArgument(
            "cannot encrypt an empty cookie value".to_string(),
        ));
    }

    let mut padded = plaintext.as_bytes().to_vec();
    let pad = BLOCK - padded.len() % BLOCK;
    padded.extend(std::iter::repeat(pad as u8).take(pad));

    let ciphertext = Aes128CbcEnc::new((&*KEY).into(), (&IV).into())
        .encrypt_padded_vec_mut::<NoPadding>(&padded);

    let mut out = Vec::with_capacity(VERSION_TAG.len() + ciphertext.len());
    out.extend_from_slice(VERSION_TAG);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt an `encrypted_value` blob back to the plaintext cookie value.
pub fn decrypt(encrypted: &[u8]) -> Result<String> {
    let Some(ciphertext) = encrypted.strip_prefix(VERSION_TAG) else {
        return Err(HarnessError::DecodeError(format!(
            "encrypted value missing v10 tag ({} bytes)",
            encrypted.len()
        )));
    };
    if ciphertext.is_empty() || ciphertext.len() % BLOCK != 0 {
        return Err(HarnessError::DecodeError(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK}",
            ciphertext.len()
        )));
    }

    let padded = Aes128CbcDec::new((&*KEY).into(), (&IV).into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|e| HarnessError::DecodeError(format!("AES-CBC decryption failed: {e}")))?;

    // The last byte states how many padding bytes to strip.
    let pad = *padded.last().unwrap_or(&0) as usize;
    if pad == 0 || pad > BLOCK || pad > padded.len() {
        return Err(HarnessError::DecodeError(format!(
            "invalid padding length {pad}"
        )));
    }

    String::from_utf8(padded[..padded.len() - pad].to_vec())
        .map_err(|e| HarnessError::DecodeError(format!("decrypted value is not UTF-8: {e}")))
}
