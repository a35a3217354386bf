//! AES-256-ECB with PKCS#7 padding, keyed by the key stored in the replay preamble.

use aes::Aes256;
use ecb::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};

use crate::error::{ReplayError, Result};

pub const KEY_LEN: usize = 32;

type Aes256EcbDec = ecb::Decryptor<Aes256>;
type Aes256EcbEnc = ecb::Encryptor<Aes256>;

fn invalid_key(key: &[u8]) -> ReplayError {
    ReplayError::Malformed(format!(
        "encryption key is {} bytes, expected {KEY_LEN}",
        key.len()
    ))
}

pub fn decrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Aes256EcbDec::new_from_slice(key)
        .map_err(|_| invalid_key(key))?
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| {
            ReplayError::Malformed(format!(
                "{} encrypted bytes do not decrypt to padded data",
                data.len()
            ))
        })
}

pub fn encrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Ok(Aes256EcbEnc::new_from_slice(key)
        .map_err(|_| invalid_key(key))?
        .encrypt_padded_vec_mut::<Pkcs7>(data))
}
