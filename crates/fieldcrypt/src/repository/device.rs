use std::sync::Arc;

use common::DeviceRecord;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{Result, StoreError};
use crate::crypto::Encryptor;
use crate::mapper::{decrypt_device, encrypt_device};
use crate::model::Device;

/// Persistence for encrypted device rows.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceStore: Send + Sync {
    /// Insert or replace the row keyed by `record.device_id`.
    fn upsert(&self, record: DeviceRecord) -> std::result::Result<(), StoreError>;

    fn find_by_user_id(&self, user_id: Uuid)
        -> std::result::Result<Vec<DeviceRecord>, StoreError>;

    fn find_by_id(&self, device_id: Uuid)
        -> std::result::Result<Option<DeviceRecord>, StoreError>;

    fn delete(&self, device_id: Uuid) -> std::result::Result<(), StoreError>;

    /// Enabled rows belonging to any of `user_ids`.
    fn active_by_user_ids(
        &self,
        user_ids: &[Uuid],
    ) -> std::result::Result<Vec<DeviceRecord>, StoreError>;

    /// Mark a row disabled.
    fn invalidate(&self, device_id: Uuid) -> std::result::Result<(), StoreError>;

    /// Every enabled row.
    fn all_active(&self) -> std::result::Result<Vec<DeviceRecord>, StoreError>;
}

/// Device repository that encrypts tokens on write and decrypts on read.
pub struct DeviceRepository<S> {
    store: S,
    encryptor: Arc<dyn Encryptor>,
}

impl<S: DeviceStore> DeviceRepository<S> {
    pub fn new(store: S, encryptor: Arc<dyn Encryptor>) -> Self {
        Self { store, encryptor }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip_all, fields(device_id = %device.id))]
    pub fn save(&self, device: &Device) -> Result<()> {
        let record = encrypt_device(&*self.encryptor, device)?;
        self.store.upsert(record)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Device>> {
        self.decrypt_all(self.store.find_by_user_id(user_id)?)
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, device_id: Uuid) -> Result<Option<Device>> {
        match self.store.find_by_id(device_id)? {
            Some(record) => Ok(Some(decrypt_device(&*self.encryptor, record)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub fn delete(&self, device_id: Uuid) -> Result<()> {
        Ok(self.store.delete(device_id)?)
    }

    /// Enabled devices for a set of users. Fails on the first undecryptable
    /// row.
    #[instrument(skip_all, fields(users = user_ids.len()))]
    pub fn active_devices_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Device>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.decrypt_all(self.store.active_by_user_ids(user_ids)?)
    }

    #[instrument(skip(self))]
    pub fn invalidate(&self, device_id: Uuid) -> Result<()> {
        Ok(self.store.invalidate(device_id)?)
    }

    /// Every enabled device, for broadcast delivery.
    ///
    /// Rows whose token cannot be decrypted are logged and left out so one
    /// corrupt row does not block delivery to everyone else.
    #[instrument(skip(self))]
    pub fn all_active_devices(&self) -> Result<Vec<Device>> {
        let records = self.store.all_active()?;
        let total = records.len();
        let mut devices = Vec::with_capacity(total);

        for record in records {
            let device_id = record.device_id;
            match decrypt_device(&*self.encryptor, record) {
                Ok(device) => devices.push(device),
                Err(e) => warn!(
                    %device_id,
                    field = e.field(),
                    kind = e.kind(),
                    "skipping device that failed to decrypt"
                ),
            }
        }

        debug!(total, returned = devices.len(), "loaded active devices");
        Ok(devices)
    }

    fn decrypt_all(&self, records: Vec<DeviceRecord>) -> Result<Vec<Device>> {
        records
            .into_iter()
            .map(|r| decrypt_device(&*self.encryptor, r).map_err(Into::into))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{AeadEngine, CryptoError};
    use crate::mapper::FieldError;
    use crate::model::Platform;
    use crate::repository::RepositoryError;
    use common::EncryptedField;

    fn encryptor() -> Arc<dyn Encryptor> {
        Arc::new(AeadEngine::new(&[9u8; 32]).unwrap())
    }

    fn record_for(encryptor: &dyn Encryptor, token: &str) -> DeviceRecord {
        let device = Device::new(Uuid::new_v4(), token, Platform::Gcm);
        encrypt_device(encryptor, &device).unwrap()
    }

    #[test]
    fn save_hands_only_ciphertext_to_store() {
        let enc = encryptor();
        let device = Device::new(Uuid::new_v4(), "secret-token", Platform::Web);
        let id = device.id;

        let mut store = MockDeviceStore::new();
        store
            .expect_upsert()
            .withf(move |r| {
                r.device_id == id
                    && r.platform == "web"
                    && !r.device_token.as_str().contains("secret-token")
            })
            .times(1)
            .returning(|_| Ok(()));

        DeviceRepository::new(store, enc).save(&device).unwrap();
    }

    #[test]
    fn all_active_skips_undecryptable_rows() {
        let enc = encryptor();
        let good_a = record_for(&*enc, "token-a");
        let good_b = record_for(&*enc, "token-b");
        let mut bad = record_for(&*enc, "token-c");
        bad.device_token = EncryptedField::new("v1.AAAA.AAAAAAAAAAAAAAAA");

        let rows = vec![good_a, bad, good_b];
        let mut store = MockDeviceStore::new();
        store
            .expect_all_active()
            .times(1)
            .returning(move || Ok(rows.clone()));

        let devices = DeviceRepository::new(store, enc).all_active_devices().unwrap();
        let tokens: Vec<_> = devices.iter().map(|d| d.token.as_str()).collect();
        assert_eq!(tokens, ["token-a", "token-b"]);
    }

    #[test]
    fn all_active_keeps_rows_with_unrecognised_platform() {
        let enc = encryptor();
        let mut fcm = record_for(&*enc, "token-f");
        fcm.platform = "FCM".into();

        let rows = vec![fcm];
        let mut store = MockDeviceStore::new();
        store
            .expect_all_active()
            .returning(move || Ok(rows.clone()));

        let devices = DeviceRepository::new(store, enc).all_active_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].platform, Platform::Other("FCM".into()));
    }

    #[test]
    fn all_active_propagates_store_failure() {
        let mut store = MockDeviceStore::new();
        store
            .expect_all_active()
            .returning(|| Err(StoreError::Backend("connection reset".into())));

        let err = DeviceRepository::new(store, encryptor())
            .all_active_devices()
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Store(StoreError::Backend(_))));
    }

    #[test]
    fn find_by_user_fails_fast_on_bad_row() {
        let enc = encryptor();
        let good = record_for(&*enc, "token-a");
        let mut bad = record_for(&*enc, "token-b");
        bad.device_token = EncryptedField::new("not-an-envelope");

        let rows = vec![good, bad];
        let mut store = MockDeviceStore::new();
        store
            .expect_find_by_user_id()
            .returning(move |_| Ok(rows.clone()));

        let err = DeviceRepository::new(store, enc)
            .find_by_user_id(Uuid::new_v4())
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Field(FieldError::Decrypt {
                field: "device_token",
                source: CryptoError::InvalidFormat,
            })
        );
    }

    #[test]
    fn empty_user_list_skips_store() {
        let mut store = MockDeviceStore::new();
        store.expect_active_by_user_ids().never();

        let devices = DeviceRepository::new(store, encryptor())
            .active_devices_for_users(&[])
            .unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn find_by_id_missing_is_none() {
        let mut store = MockDeviceStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let found = DeviceRepository::new(store, encryptor())
            .find_by_id(Uuid::new_v4())
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn not_found_maps_to_service_not_found() {
        let mut store = MockDeviceStore::new();
        store.expect_delete().returning(|_| Err(StoreError::NotFound));

        let err = DeviceRepository::new(store, encryptor())
            .delete(Uuid::new_v4())
            .unwrap_err();
        assert_eq!(common::ServiceError::from(err).http_status(), 404);
    }
}
