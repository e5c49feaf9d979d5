//! RSA keypair management for tracked-request tokens.

use crate::error::TrackerError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use std::path::Path;

const KEY_BITS: usize = 2048;

/// An RSA keypair for signing and verifying tracked-request tokens.
///
/// Only the private key is supplied; the public half is derived from it.
#[derive(Clone)]
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key_pem: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key_pem", &self.public_key_pem)
            .finish()
    }
}

impl KeyPair {
    /// Generate a new random 2048-bit keypair.
    pub fn generate() -> Result<Self, TrackerError> {
        let mut rng = rsa::rand_core::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, KEY_BITS)
            .map_err(|e| TrackerError::KeyGenerationFailed(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    /// Create a keypair from an existing private key.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self, TrackerError> {
        let public_key_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))?;
        let private_key_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))?;

        Ok(Self {
            private_key,
            public_key_pem,
            encoding_key,
            decoding_key,
        })
    }

    /// Load a keypair from a PEM-encoded private key (PKCS#8 or PKCS#1).
    pub fn from_private_key_pem(pem: &str) -> Result<Self, TrackerError> {
        let pem = pem.trim();
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    /// Get the private key as a PKCS#8 PEM string.
    pub fn private_key_pem(&self) -> Result<String, TrackerError> {
        self.private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| TrackerError::InvalidKey(e.to_string()))
    }

    /// Get the public key as an SPKI PEM string.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Save the keypair to files.
    pub fn save_to_files(
        &self,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> Result<(), TrackerError> {
        std::fs::write(private_key_path, self.private_key_pem()?)?;
        std::fs::write(public_key_path, &self.public_key_pem)?;
        Ok(())
    }

    /// Load a keypair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, TrackerError> {
        let pem = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_pem(&pem)
    }
}
