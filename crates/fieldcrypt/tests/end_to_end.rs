//! Public-API scenarios: write demographics and devices with the configured
//! engine, read them back, and recover rows written by the legacy engine.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fieldcrypt::mapper::{decrypt_demographics, encrypt_demographics};
use fieldcrypt::model::{City, Device, Gender, Platform, UserDemographics, YearOfBirth};
use fieldcrypt::{
    encryptor_for_ciphertext, new_encryptor, CryptoConfig, CryptoError, DeviceRepository,
    DeviceStore, Encryptor, LegacyEngine, MemoryDeviceStore,
};
use uuid::Uuid;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn configured() -> fieldcrypt::VersionedEncryptor {
    new_encryptor(&CryptoConfig::new("v1", SECRET)).expect("v1 config")
}

fn assert_envelope_shape(envelope: &str, nonce_len: usize) {
    let parts: Vec<_> = envelope.split('.').collect();
    assert_eq!(parts.len(), 3, "{envelope}");
    assert_eq!(parts[0], "v1");
    assert!(STANDARD.decode(parts[1]).is_ok());
    assert_eq!(STANDARD.decode(parts[2]).unwrap().len(), nonce_len);
}

#[test]
fn demographics_partial_profile_round_trip() {
    let encryptor = configured();

    let mut profile = UserDemographics::new(Uuid::new_v4(), Uuid::new_v4());
    profile.year_of_birth = YearOfBirth::new(1990);
    profile.gender = Some(Gender::Male);
    profile.city = City::new("Nakano");

    let record = encrypt_demographics(&encryptor, &profile).unwrap();
    assert_eq!(record.populated_fields(), 3);
    assert!(record.prefecture.is_none());
    for field in [&record.year_of_birth, &record.gender, &record.city] {
        assert_envelope_shape(field.as_ref().unwrap().as_str(), 12);
    }

    let back = decrypt_demographics(&encryptor, &record).unwrap();
    assert_eq!(back, profile);
    assert_eq!(back.prefecture, None);
}

#[test]
fn stored_rows_survive_a_json_hop() {
    let encryptor = configured();
    let mut profile = UserDemographics::new(Uuid::new_v4(), Uuid::new_v4());
    profile.city = City::new("Sapporo");

    let record = encrypt_demographics(&encryptor, &profile).unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let restored = serde_json::from_str(&json).unwrap();
    assert_eq!(decrypt_demographics(&encryptor, &restored).unwrap(), profile);
}

#[test]
fn legacy_envelope_is_dispatched_and_decrypted() {
    let legacy = LegacyEngine::new(SECRET.as_bytes()).unwrap();
    let old = legacy.encrypt_string("Nakano").unwrap();
    assert_envelope_shape(&old, 16);

    let resolved = encryptor_for_ciphertext(&old, SECRET.as_bytes()).unwrap();
    assert!(resolved.is_legacy());
    assert_eq!(resolved.decrypt_string(&old).unwrap(), "Nakano");

    let current = configured().encrypt_string("Nakano").unwrap();
    let resolved = encryptor_for_ciphertext(&current, SECRET.as_bytes()).unwrap();
    assert!(!resolved.is_legacy());
}

#[test]
fn malformed_envelopes_are_rejected() {
    let encryptor = configured();
    for bad in ["invalidformat", "v1.data", "v1.a.b.c", ""] {
        assert_eq!(
            encryptor.decrypt_string(bad).unwrap_err(),
            CryptoError::InvalidFormat,
            "{bad:?}"
        );
    }
    assert_eq!(
        encryptor.decrypt_string("v2.YWJj.ZGVm").unwrap_err(),
        CryptoError::UnsupportedVersion("v2".into())
    );
}

#[test]
fn device_repository_over_memory_store() {
    let encryptor: Arc<dyn Encryptor> = Arc::new(configured());
    let repo = DeviceRepository::new(MemoryDeviceStore::new(), encryptor);

    let user = Uuid::new_v4();
    let ios = Device::new(user, "ios-token", Platform::Apns);
    let web = Device::new(user, "web-token", Platform::Web);
    repo.save(&ios).unwrap();
    repo.save(&web).unwrap();

    let stored = repo.store().find_by_id(ios.id).unwrap().unwrap();
    assert!(!stored.device_token.as_str().contains("ios-token"));

    assert_eq!(repo.find_by_id(ios.id).unwrap().unwrap(), ios);
    assert_eq!(repo.find_by_user_id(user).unwrap().len(), 2);

    repo.invalidate(web.id).unwrap();
    let active = repo.active_devices_for_users(&[user]).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token, "ios-token");
    assert_eq!(repo.all_active_devices().unwrap().len(), 1);

    repo.delete(ios.id).unwrap();
    assert!(repo.find_by_id(ios.id).unwrap().is_none());
}
