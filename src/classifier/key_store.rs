use std::path::{Path, PathBuf};

use crate::app_dirs;

const KEYRING_SERVICE: &str = "gesture_commander";
const KEYRING_KEY: &str = "gesture_commander_api_key";
const DISABLE_KEYRING_ENV: &str = "GESTURE_COMMANDER_DISABLE_KEYRING";

#[derive(Debug, thiserror::Error)]
pub enum ApiKeyStoreError {
    #[error("Key store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Crypto error: {0}")]
    Crypto(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("App dir error: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Inference API key storage: OS keyring first, encrypted file as fallback.
#[derive(Clone, Debug)]
pub struct ApiKeyStore {
    fallback_dir: PathBuf,
}

impl ApiKeyStore {
    pub fn new() -> Result<Self, ApiKeyStoreError> {
        Ok(Self {
            fallback_dir: app_dirs::secrets_dir()?,
        })
    }

    /// Key from `env_var` when set and non-empty, else whatever is stored.
    pub fn resolve(&self, env_var: &str) -> Result<Option<String>, ApiKeyStoreError> {
        if let Ok(value) = std::env::var(env_var) {
            let value = value.trim();
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
        self.get()
    }

    pub fn get(&self) -> Result<Option<String>, ApiKeyStoreError> {
        if let Some(key) = self.try_keyring_get()? {
            return Ok(Some(key));
        }
        self.fallback_get()
    }

    pub fn set(&self, key: &str) -> Result<(), ApiKeyStoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(());
        }
        if self.try_keyring_set(key).is_ok() {
            let _ = self.fallback_delete();
            return Ok(());
        }
        self.fallback_set(key)
    }

    pub fn delete(&self) -> Result<(), ApiKeyStoreError> {
        let _ = self.try_keyring_delete();
        let _ = self.fallback_delete();
        Ok(())
    }

    fn keyring_entry() -> Result<keyring::Entry, ApiKeyStoreError> {
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY)
            .map_err(|err| ApiKeyStoreError::Unavailable(err.to_string()))
    }

    fn try_keyring_get(&self) -> Result<Option<String>, ApiKeyStoreError> {
        if keyring_disabled() {
            return Ok(None);
        }
        match Self::keyring_entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => {
                tracing::debug!("Keyring lookup failed: {err}");
                Ok(None)
            }
        }
    }

    fn try_keyring_set(&self, key: &str) -> Result<(), ApiKeyStoreError> {
        if keyring_disabled() {
            return Err(ApiKeyStoreError::Unavailable("keyring disabled".into()));
        }
        Self::keyring_entry()?
            .set_password(key)
            .map_err(|err| ApiKeyStoreError::Unavailable(err.to_string()))
    }

    fn try_keyring_delete(&self) -> Result<(), ApiKeyStoreError> {
        if keyring_disabled() {
            return Ok(());
        }
        let _ = Self::keyring_entry()?.delete_credential();
        Ok(())
    }

    fn fallback_key_path(&self) -> PathBuf {
        self.fallback_dir.join("api_key.bin")
    }

    fn fallback_cipher_key_path(&self) -> PathBuf {
        self.fallback_dir.join("api_key.key")
    }

    fn fallback_get(&self) -> Result<Option<String>, ApiKeyStoreError> {
        let path = self.fallback_key_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(path)?;
        if data.len() < 12 {
            return Err(ApiKeyStoreError::Decode("key file too short".into()));
        }
        let (nonce, ciphertext) = data.split_at(12);
        let cipher_key = std::fs::read(self.fallback_cipher_key_path())?;
        if cipher_key.len() != 32 {
            return Err(ApiKeyStoreError::Decode("cipher key invalid".into()));
        }
        let plaintext = decrypt(&cipher_key, nonce, ciphertext)?;
        let key =
            String::from_utf8(plaintext).map_err(|err| ApiKeyStoreError::Decode(err.to_string()))?;
        Ok(Some(key))
    }

    fn fallback_set(&self, key: &str) -> Result<(), ApiKeyStoreError> {
        let cipher_key_path = self.fallback_cipher_key_path();
        let cipher_key = if cipher_key_path.exists() {
            std::fs::read(&cipher_key_path)?
        } else {
            let bytes = random_bytes(32)?;
            write_private_file(&cipher_key_path, &bytes)?;
            bytes
        };
        if cipher_key.len() != 32 {
            return Err(ApiKeyStoreError::Decode("cipher key invalid".into()));
        }
        let nonce = random_bytes(12)?;
        let ciphertext = encrypt(&cipher_key, &nonce, key.as_bytes())?;
        let mut payload = Vec::with_capacity(nonce.len() + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        write_private_file(&self.fallback_key_path(), &payload)
    }

    fn fallback_delete(&self) -> Result<(), ApiKeyStoreError> {
        let _ = std::fs::remove_file(self.fallback_key_path());
        let _ = std::fs::remove_file(self.fallback_cipher_key_path());
        Ok(())
    }
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn random_bytes(len: usize) -> Result<Vec<u8>, ApiKeyStoreError> {
    use rand::TryRngCore;
    let mut out = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| ApiKeyStoreError::Unavailable(err.to_string()))?;
    Ok(out)
}

fn write_private_file(path: &Path, bytes: &[u8]) -> Result<(), ApiKeyStoreError> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

fn encrypt(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, ApiKeyStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| ApiKeyStoreError::Crypto(err.to_string()))?;
    cipher
        .encrypt(chacha20poly1305::Nonce::from_slice(nonce), plaintext)
        .map_err(|err| ApiKeyStoreError::Crypto(err.to_string()))
}

fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ApiKeyStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| ApiKeyStoreError::Crypto(err.to_string()))?;
    cipher
        .decrypt(chacha20poly1305::Nonce::from_slice(nonce), ciphertext)
        .map_err(|err| ApiKeyStoreError::Crypto(err.to_string()))
}
