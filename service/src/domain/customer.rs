//! [`Customer`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer renting games.
#[derive(Clone, Debug, From)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// [`Name`] of this [`Customer`].
    pub name: Name,

    /// [`Phone`] of this [`Customer`].
    pub phone: Phone,

    /// [`Cpf`] of this [`Customer`].
    ///
    /// Unique across all [`Customer`]s.
    pub cpf: Cpf,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Customer`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] invariants:
        /// - Must consist of digits only;
        /// - Must be 10 or 11 digits long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9]{10,11}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [CPF] (Brazilian national ID) of a [`Customer`].
///
/// [CPF]: https://en.wikipedia.org/wiki/CPF_number
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Cpf(String);

impl Cpf {
    /// Creates a new [`Cpf`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `cpf` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(cpf: impl Into<String>) -> Self {
        Self(cpf.into())
    }

    /// Creates a new [`Cpf`] if the given `cpf` is valid.
    #[must_use]
    pub fn new(cpf: impl Into<String>) -> Option<Self> {
        let cpf = cpf.into();
        Self::check(&cpf).then_some(Self(cpf))
    }

    /// Checks whether the given `cpf` is a valid [`Cpf`].
    fn check(cpf: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Cpf`] invariants:
        /// - Must consist of digits only;
        /// - Must be exactly 11 digits long.
        static REGEX: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("valid regex"));

        REGEX.is_match(cpf.as_ref())
    }
}

impl FromStr for Cpf {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Cpf`")
    }
}

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Cpf, Name, Phone};

    #[test]
    fn name_requires_non_blank_trimmed() {
        assert!(Name::new("Ann").is_some());
        assert!(Name::new("Maria da Silva").is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" Ann").is_none());
        assert!(Name::new("Ann ").is_none());
        assert!(Name::new("a".repeat(513)).is_none());
    }

    #[test]
    fn phone_requires_10_to_11_digits() {
        assert!(Phone::new("1199999999").is_some());
        assert!(Phone::new("11999999999").is_some());

        assert!(Phone::new("119999999").is_none());
        assert!(Phone::new("119999999999").is_none());
        assert!(Phone::new("11x99999999").is_none());
        assert!(Phone::new("").is_none());
    }

    #[test]
    fn cpf_requires_exactly_11_digits() {
        assert!(Cpf::new("12345678901").is_some());

        assert!(Cpf::new("1234567890").is_none());
        assert!(Cpf::new("123456789012").is_none());
        assert!(Cpf::new("123.456.789-01").is_none());
        assert!(Cpf::new("").is_none());
    }
}
