//! Device ⇄ [`DeviceRecord`]. Only the push token is encrypted.

use common::{DeviceRecord, EncryptedField};
use tracing::instrument;

use super::FieldError;
use crate::crypto::Encryptor;
use crate::model::{Device, Platform};

/// Encrypt the device token; copy every other attribute unchanged.
///
/// # Errors
///
/// [`FieldError::Encrypt`] naming `device_token`.
#[instrument(skip_all, fields(device_id = %device.id))]
pub fn encrypt_device<E: Encryptor + ?Sized>(
    encryptor: &E,
    device: &Device,
) -> Result<DeviceRecord, FieldError> {
    let device_token = encryptor
        .encrypt_string(&device.token)
        .map(EncryptedField::from)
        .map_err(|source| FieldError::Encrypt {
            field: "device_token",
            source,
        })?;

    Ok(DeviceRecord {
        device_id: device.id,
        user_id: device.user_id,
        device_token,
        platform: device.platform.as_str().to_owned(),
        enabled: device.enabled,
        device_name: device.device_name.clone(),
        app_version: device.app_version.clone(),
        os_version: device.os_version.clone(),
        last_active_at: device.last_active_at,
        created_at: device.created_at,
        updated_at: device.updated_at,
    })
}

/// Decrypt the device token of `record` and rebuild the domain device.
///
/// # Errors
///
/// [`FieldError::Decrypt`] naming `device_token` when the envelope cannot be
/// opened. Platform and the other metadata are passed through; an unrecognised
/// platform is kept as [`Platform::Other`].
#[instrument(skip_all, fields(device_id = %record.device_id))]
pub fn decrypt_device<E: Encryptor + ?Sized>(
    decryptor: &E,
    record: DeviceRecord,
) -> Result<Device, FieldError> {
    let token = decryptor
        .decrypt_string(record.device_token.as_str())
        .map_err(|source| FieldError::Decrypt {
            field: "device_token",
            source,
        })?;
    Ok(Device {
        id: record.device_id,
        user_id: record.user_id,
        token,
        platform: Platform::from(record.platform),
        device_name: record.device_name,
        app_version: record.app_version,
        os_version: record.os_version,
        enabled: record.enabled,
        last_active_at: record.last_active_at,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
