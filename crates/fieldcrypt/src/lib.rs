//! Versioned field-level encryption for personally identifiable data.
//!
//! Every sensitive attribute is stored as a self-describing envelope:
//!
//! ```text
//! <version>.<base64 ciphertext>.<base64 nonce or IV>
//! ```
//!
//! - [`crypto`] holds the envelope codec, the AES-GCM engine used for all new
//!   writes, the legacy AES-CBC engine kept for reading old rows, and the
//!   version dispatcher.
//! - [`mapper`] converts domain objects to and from their encrypted records.
//! - [`repository`] wraps a storage backend and applies the bulk-read policy.
//! - [`migrate`] re-encrypts stored envelopes.

pub mod config;
pub mod crypto;
pub mod key;
pub mod mapper;
pub mod migrate;
pub mod model;
pub mod repository;

pub use config::CryptoConfig;
pub use crypto::{
    encryptor_for_ciphertext, new_encryptor, AeadEngine, CryptoError, Encryptor, LegacyEngine,
    Version, VersionedEncryptor,
};
pub use key::SecretKey;
pub use mapper::FieldError;
pub use migrate::{reencrypt, reencrypt_detected};
pub use repository::{DeviceRepository, DeviceStore, MemoryDeviceStore, RepositoryError};
