//! User demographic attributes.
//!
//! Every attribute is optional. Integer-coded attributes (gender, occupation)
//! are persisted by their numeric code; constructors drop out-of-domain values
//! rather than failing, so a row holding an unknown code reads back as absent.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::UnknownValue;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male = 1,
    Female = 2,
    Other = 3,
    PreferNotToSay = 4,
}

impl Gender {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            3 => Some(Gender::Other),
            4 => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer_not_to_say" => Ok(Gender::PreferNotToSay),
            _ => Err(UnknownValue::new("gender", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Occupation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupation {
    FullTimeEmployee = 1,
    ContractEmployee = 2,
    PublicServant = 3,
    SelfEmployed = 4,
    Executive = 5,
    PartTimeEmployee = 6,
    Homemaker = 7,
    Student = 8,
    Unemployed = 9,
    NoAnswer = 10,
}

impl Occupation {
    const ALL: [Occupation; 10] = [
        Occupation::FullTimeEmployee,
        Occupation::ContractEmployee,
        Occupation::PublicServant,
        Occupation::SelfEmployed,
        Occupation::Executive,
        Occupation::PartTimeEmployee,
        Occupation::Homemaker,
        Occupation::Student,
        Occupation::Unemployed,
        Occupation::NoAnswer,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Occupation::FullTimeEmployee => "full_time_employee",
            Occupation::ContractEmployee => "contract_employee",
            Occupation::PublicServant => "public_servant",
            Occupation::SelfEmployed => "self_employed",
            Occupation::Executive => "executive",
            Occupation::PartTimeEmployee => "part_time_employee",
            Occupation::Homemaker => "homemaker",
            Occupation::Student => "student",
            Occupation::Unemployed => "unemployed",
            Occupation::NoAnswer => "no_answer",
        }
    }
}

impl FromStr for Occupation {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownValue::new("occupation", s))
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scalar attributes
// ---------------------------------------------------------------------------

/// Earliest accepted year of birth.
pub const MIN_YEAR_OF_BIRTH: i32 = 1900;

/// Year of birth, from [`MIN_YEAR_OF_BIRTH`] up to (not including) the
/// current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearOfBirth(i32);

impl YearOfBirth {
    pub fn new(year: i32) -> Option<Self> {
        (MIN_YEAR_OF_BIRTH..Utc::now().year())
            .contains(&year)
            .then_some(Self(year))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Age reached during the current calendar year.
    pub fn age(self) -> i32 {
        Utc::now().year() - self.0
    }
}

/// Number of people in the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HouseholdSize(u8);

impl HouseholdSize {
    pub const MAX: u8 = 99;

    pub fn new(size: i64) -> Option<Self> {
        u8::try_from(size)
            .ok()
            .filter(|s| (1..=Self::MAX).contains(s))
            .map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// City of residence; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct City(String);

impl City {
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty()).then_some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The demographic profile of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDemographics {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year_of_birth: Option<YearOfBirth>,
    pub gender: Option<Gender>,
    pub city: Option<City>,
    pub prefecture: Option<String>,
    pub occupation: Option<Occupation>,
    pub household_size: Option<HouseholdSize>,
}

impl UserDemographics {
    /// A profile with no attributes set.
    pub fn new(id: Uuid, user_id: Uuid) -> Self {
        Self {
            id,
            user_id,
            year_of_birth: None,
            gender: None,
            city: None,
            prefecture: None,
            occupation: None,
            household_size: None,
        }
    }

    /// Numeric projection used by read paths and API responses.
    pub fn view(&self) -> DemographicsView {
        DemographicsView {
            user_demographics_id: self.id,
            user_id: self.user_id,
            year_of_birth: self.year_of_birth.map(YearOfBirth::get),
            gender: self.gender.map(Gender::code),
            city: self.city.as_ref().map(|c| c.as_str().to_owned()),
            prefecture: self.prefecture.clone(),
            occupation: self.occupation.map(Occupation::code),
            household_size: self.household_size.map(HouseholdSize::get),
        }
    }
}

/// Decrypted demographics flattened to codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicsView {
    pub user_demographics_id: Uuid,
    pub user_id: Uuid,
    pub year_of_birth: Option<i32>,
    pub gender: Option<i64>,
    pub city: Option<String>,
    pub prefecture: Option<String>,
    pub occupation: Option<i64>,
    pub household_size: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_and_names() {
        for g in [
            Gender::Male,
            Gender::Female,
            Gender::Other,
            Gender::PreferNotToSay,
        ] {
            assert_eq!(Gender::from_code(g.code()), Some(g));
            assert_eq!(g.as_str().parse::<Gender>().unwrap(), g);
        }
        assert_eq!(Gender::from_code(0), None);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn occupation_codes_span_one_to_ten() {
        assert_eq!(Occupation::from_code(1), Some(Occupation::FullTimeEmployee));
        assert_eq!(Occupation::from_code(10), Some(Occupation::NoAnswer));
        assert_eq!(Occupation::from_code(11), None);
        assert_eq!("student".parse::<Occupation>().unwrap(), Occupation::Student);
    }

    #[test]
    fn year_of_birth_range() {
        assert_eq!(YearOfBirth::new(1990).map(YearOfBirth::get), Some(1990));
        assert!(YearOfBirth::new(1899).is_none());
        assert!(YearOfBirth::new(Utc::now().year()).is_none());
        assert_eq!(
            YearOfBirth::new(1990).unwrap().age(),
            Utc::now().year() - 1990
        );
    }

    #[test]
    fn household_size_range() {
        assert_eq!(HouseholdSize::new(3).map(HouseholdSize::get), Some(3));
        assert!(HouseholdSize::new(0).is_none());
        assert!(HouseholdSize::new(100).is_none());
        assert!(HouseholdSize::new(-1).is_none());
    }

    #[test]
    fn empty_city_is_absent() {
        assert!(City::new("").is_none());
        assert_eq!(City::new("Nakano").unwrap().as_str(), "Nakano");
    }

    #[test]
    fn view_uses_codes() {
        let mut d = UserDemographics::new(Uuid::new_v4(), Uuid::new_v4());
        d.gender = Some(Gender::Female);
        d.occupation = Some(Occupation::Student);
        let view = d.view();
        assert_eq!(view.gender, Some(2));
        assert_eq!(view.occupation, Some(8));
        assert_eq!(view.city, None);
    }
}
