//! [`Game`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Board game available for rent.
#[derive(Clone, Debug, From)]
pub struct Game {
    /// ID of this [`Game`].
    pub id: Id,

    /// [`Name`] of this [`Game`].
    ///
    /// Unique across all [`Game`]s.
    pub name: Name,

    /// [`ImageUrl`] of this [`Game`].
    pub image: ImageUrl,

    /// [`StockTotal`] of this [`Game`]: the number of physical copies owned,
    /// so the maximum number of simultaneously active rentals.
    ///
    /// Fixed at creation.
    pub stock_total: StockTotal,

    /// [`PricePerDay`] of renting this [`Game`].
    pub price_per_day: PricePerDay,

    /// [`DateTime`] when this [`Game`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Game`].
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

/// Name of a [`Game`].
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

/// URL of a [`Game`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`]:
    /// - Must use an `http://` or `https://` scheme;
    /// - Must be at most 2048 characters long.
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        (url.starts_with("http://") || url.starts_with("https://"))
            && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Total stock of a [`Game`]: the number of physical copies owned.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct StockTotal(i32);

impl StockTotal {
    /// Creates a new [`StockTotal`] if the given `total` is positive.
    #[must_use]
    pub fn new(total: i32) -> Option<Self> {
        (total > 0).then_some(Self(total))
    }

    /// Returns the number of copies of this [`StockTotal`].
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for StockTotal {
    type Error = &'static str;

    fn try_from(total: i32) -> Result<Self, Self::Error> {
        Self::new(total).ok_or("`StockTotal` must be positive")
    }
}

/// Daily rental price of a [`Game`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PricePerDay(Money);

impl PricePerDay {
    /// Creates a new [`PricePerDay`] if the given `price` is positive.
    #[must_use]
    pub fn new(price: Money) -> Option<Self> {
        (!price.is_zero()).then_some(Self(price))
    }
}

impl TryFrom<Money> for PricePerDay {
    type Error = &'static str;

    fn try_from(price: Money) -> Result<Self, Self::Error> {
        Self::new(price).ok_or("`PricePerDay` must be positive")
    }
}

impl FromStr for PricePerDay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Money>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `PricePerDay`")
    }
}

/// [`DateTime`] when a [`Game`] was created.
pub type CreationDateTime = DateTimeOf<(Game, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{ImageUrl, Name, PricePerDay, StockTotal};

    #[test]
    fn name_requires_non_blank_trimmed() {
        assert!(Name::new("Chess").is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" Chess").is_none());
        assert!(Name::new("a".repeat(513)).is_none());
    }

    #[test]
    fn image_url_requires_http_scheme() {
        assert!(ImageUrl::new("http://example.com/chess.png").is_some());
        assert!(ImageUrl::new("https://example.com/chess.png").is_some());

        assert!(ImageUrl::new("ftp://example.com/chess.png").is_none());
        assert!(ImageUrl::new("example.com/chess.png").is_none());
        assert!(ImageUrl::new("").is_none());
    }

    #[test]
    fn stock_total_requires_positive() {
        assert!(StockTotal::new(1).is_some());
        assert!(StockTotal::new(3).is_some());

        assert!(StockTotal::new(0).is_none());
        assert!(StockTotal::new(-1).is_none());
    }

    #[test]
    fn price_per_day_requires_positive() {
        assert!(PricePerDay::new(Money::new(1500).unwrap()).is_some());

        assert!(PricePerDay::new(Money::ZERO).is_none());
    }
}
