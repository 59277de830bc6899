//! Field-level decryption and markup stripping
//!
//! Remote question, explanation, and answer text columns are symmetrically
//! encrypted (AES-128-CBC, PKCS7, base64-wrapped ciphertext; the secret key
//! is base64-encoded, the init vector a raw 16-byte string). With decryption
//! disabled by configuration the transform is an identity pass-through, for
//! plain-text snapshots.

use crate::{Error, Result};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Ground-school content decryptor
#[derive(Debug, Clone)]
pub struct GsDecryptor {
    enabled: bool,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl GsDecryptor {
    /// Build a decryptor. Key and IV are only validated when decryption
    /// is enabled.
    pub fn new(enabled: bool, secret_key: &str, init_vector: &str) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                enabled: false,
                key: Vec::new(),
                iv: Vec::new(),
            });
        }

        let key = BASE64
            .decode(secret_key)
            .map_err(|e| Error::Config(format!("secret key is not valid base64: {}", e)))?;
        if key.len() != 16 {
            return Err(Error::Config(format!(
                "secret key must decode to 16 bytes, got {}",
                key.len()
            )));
        }
        let iv = init_vector.as_bytes().to_vec();
        if iv.len() != 16 {
            return Err(Error::Config(format!(
                "init vector must be 16 bytes, got {}",
                iv.len()
            )));
        }

        Ok(Self {
            enabled: true,
            key,
            iv,
        })
    }

    /// Decrypt one field. Identity when decryption is disabled.
    pub fn decrypt(&self, content: &str) -> Result<String> {
        if !self.enabled {
            return Ok(content.to_string());
        }

        let ciphertext = BASE64
            .decode(content.trim())
            .map_err(|e| Error::Decrypt(format!("ciphertext is not valid base64: {}", e)))?;

        let cipher = Aes128CbcDec::new_from_slices(&self.key, &self.iv)
            .map_err(|_| Error::Decrypt("invalid key or IV length".to_string()))?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| Error::Decrypt("bad ciphertext or padding".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| Error::Decrypt(format!("plaintext is not valid UTF-8: {}", e)))
    }
}

/// Strip markup from a decrypted field, leaving plain text with
/// collapsed whitespace.
pub fn strip_markup(content: &str) -> String {
    let text =
        html2text::from_read(content.as_bytes(), 10_000).unwrap_or_else(|_| content.to_string());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::BlockEncryptMut;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    const SECRET_KEY: &str = "SecretpwkMZYaXKeyqB86A==";
    const INIT_VECTOR: &str = "FgInitskVectorrl";

    fn encrypt(plaintext: &str) -> String {
        let key = BASE64.decode(SECRET_KEY).unwrap();
        let cipher = Aes128CbcEnc::new_from_slices(&key, INIT_VECTOR.as_bytes()).unwrap();
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64.encode(ciphertext)
    }

    #[test]
    fn disabled_decryptor_is_identity() {
        let decryptor = GsDecryptor::new(false, "", "").unwrap();
        assert_eq!(decryptor.decrypt("Some random text").unwrap(), "Some random text");
    }

    #[test]
    fn round_trips_encrypted_content() {
        let decryptor = GsDecryptor::new(true, SECRET_KEY, INIT_VECTOR).unwrap();
        let encrypted = encrypt("What airspeed is VNE?");
        assert_eq!(decryptor.decrypt(&encrypted).unwrap(), "What airspeed is VNE?");
    }

    #[test]
    fn garbage_ciphertext_is_an_error() {
        let decryptor = GsDecryptor::new(true, SECRET_KEY, INIT_VECTOR).unwrap();
        assert!(matches!(decryptor.decrypt("@@not base64@@"), Err(Error::Decrypt(_))));
        // Valid base64 but not a cipher block
        assert!(matches!(decryptor.decrypt("YWJj"), Err(Error::Decrypt(_))));
    }

    #[test]
    fn bad_key_is_a_config_error() {
        assert!(matches!(
            GsDecryptor::new(true, "dG9vc2hvcnQ=", INIT_VECTOR),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GsDecryptor::new(true, SECRET_KEY, "short"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn strip_markup_extracts_plain_text() {
        let stripped = strip_markup("<html><body><p>See FAR 91.155</p><p>for minimums.</p></body></html>");
        assert_eq!(stripped, "See FAR 91.155 for minimums.");
    }

    #[test]
    fn strip_markup_passes_plain_text_through() {
        assert_eq!(strip_markup("already plain"), "already plain");
    }
}
