//! In-process [`DeviceStore`] used by tests and local tooling.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::DeviceRecord;
use uuid::Uuid;

use super::{DeviceStore, StoreError};

type Rows = HashMap<Uuid, DeviceRecord>;

#[derive(Debug, Default)]
pub struct MemoryDeviceStore {
    rows: RwLock<Rows>,
}

impl MemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn select(
        &self,
        pred: impl Fn(&DeviceRecord) -> bool,
    ) -> Result<Vec<DeviceRecord>, StoreError> {
        let mut out: Vec<_> = self
            .read()?
            .values()
            .filter(|r| pred(r))
            .cloned()
            .collect();
        out.sort_by_key(|r| (r.created_at, r.device_id));
        Ok(out)
    }
}

impl DeviceStore for MemoryDeviceStore {
    fn upsert(&self, record: DeviceRecord) -> Result<(), StoreError> {
        self.write()?.insert(record.device_id, record);
        Ok(())
    }

    fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<DeviceRecord>, StoreError> {
        self.select(|r| r.user_id == user_id)
    }

    fn find_by_id(&self, device_id: Uuid) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(self.read()?.get(&device_id).cloned())
    }

    fn delete(&self, device_id: Uuid) -> Result<(), StoreError> {
        self.write()?
            .remove(&device_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn active_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<DeviceRecord>, StoreError> {
        self.select(|r| r.enabled && user_ids.contains(&r.user_id))
    }

    fn invalidate(&self, device_id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.write()?;
        let row = rows.get_mut(&device_id).ok_or(StoreError::NotFound)?;
        row.enabled = false;
        row.updated_at = chrono::Utc::now();
        Ok(())
    }

    fn all_active(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        self.select(|r| r.enabled)
    }
}
