//! Demographics ⇄ [`DemographicsRecord`].

use common::DemographicsRecord;
use tracing::{debug, instrument};

use super::{open_int, open_str, seal_int, seal_str, FieldError};
use crate::crypto::Encryptor;
use crate::model::{
    City, DemographicsView, Gender, HouseholdSize, Occupation, UserDemographics, YearOfBirth,
};

/// Encrypt every present attribute of `demographics`.
///
/// Gender, occupation, year of birth and household size are encrypted as
/// integers; city and prefecture as strings. Nothing is persisted here, so a
/// failure leaves no partial state; callers that write the record together
/// with other rows own the transaction.
///
/// # Errors
///
/// Returns the first [`FieldError::Encrypt`] encountered.
#[instrument(skip_all, fields(user_demographics_id = %demographics.id))]
pub fn encrypt_demographics<E: Encryptor + ?Sized>(
    encryptor: &E,
    demographics: &UserDemographics,
) -> Result<DemographicsRecord, FieldError> {
    Ok(DemographicsRecord {
        user_demographics_id: demographics.id,
        user_id: demographics.user_id,
        year_of_birth: seal_int(
            encryptor,
            "year_of_birth",
            demographics.year_of_birth.map(|y| i64::from(y.get())),
        )?,
        gender: seal_int(encryptor, "gender", demographics.gender.map(Gender::code))?,
        city: seal_str(encryptor, "city", demographics.city.as_ref().map(City::as_str))?,
        prefecture: seal_str(encryptor, "prefecture", demographics.prefecture.as_deref())?,
        occupation: seal_int(
            encryptor,
            "occupation",
            demographics.occupation.map(Occupation::code),
        )?,
        household_size: seal_int(
            encryptor,
            "household_size",
            demographics.household_size.map(|h| i64::from(h.get())),
        )?,
    })
}

/// Decrypt every populated attribute of `record`.
///
/// An absent column maps to an absent attribute. A decrypted value outside the
/// attribute's domain (e.g. an unknown gender code) also maps to absent.
///
/// # Errors
///
/// Returns [`FieldError::Decrypt`] for the first populated column that fails
/// to decrypt; no partially decrypted object is returned.
#[instrument(skip_all, fields(user_demographics_id = %record.user_demographics_id))]
pub fn decrypt_demographics<E: Encryptor + ?Sized>(
    decryptor: &E,
    record: &DemographicsRecord,
) -> Result<UserDemographics, FieldError> {
    let year_of_birth = open_int(decryptor, "year_of_birth", record.year_of_birth.as_ref())?;
    let gender = open_int(decryptor, "gender", record.gender.as_ref())?;
    let city = open_str(decryptor, "city", record.city.as_ref())?;
    let prefecture = open_str(decryptor, "prefecture", record.prefecture.as_ref())?;
    let occupation = open_int(decryptor, "occupation", record.occupation.as_ref())?;
    let household_size = open_int(decryptor, "household_size", record.household_size.as_ref())?;

    let mut demographics = UserDemographics::new(record.user_demographics_id, record.user_id);
    demographics.year_of_birth = in_domain("year_of_birth", year_of_birth, |v| {
        i32::try_from(v).ok().and_then(YearOfBirth::new)
    });
    demographics.gender = in_domain("gender", gender, Gender::from_code);
    demographics.city = city.and_then(City::new);
    demographics.prefecture = prefecture;
    demographics.occupation = in_domain("occupation", occupation, Occupation::from_code);
    demographics.household_size = in_domain("household_size", household_size, HouseholdSize::new);
    Ok(demographics)
}

/// Decrypt `record` straight into its numeric [`DemographicsView`].
///
/// # Errors
///
/// As [`decrypt_demographics`].
pub fn decrypt_demographics_view<E: Encryptor + ?Sized>(
    decryptor: &E,
    record: &DemographicsRecord,
) -> Result<DemographicsView, FieldError> {
    decrypt_demographics(decryptor, record).map(|d| d.view())
}

fn in_domain<T>(
    field: &'static str,
    raw: Option<i64>,
    build: impl FnOnce(i64) -> Option<T>,
) -> Option<T> {
    let value = raw.and_then(build);
    if raw.is_some() && value.is_none() {
        debug!(field, "decrypted value outside domain; treating as absent");
    }
    value
}
