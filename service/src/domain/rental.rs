//! [`Rental`] definitions.

#[cfg(doc)]
use common::Date;
use common::{unit, DateOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, game};
#[cfg(doc)]
use crate::domain::{Customer, Game};

/// Rental of a [`Game`] by a [`Customer`].
#[derive(Clone, Debug, From)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`Customer`] renting the [`Game`].
    pub customer_id: customer::Id,

    /// ID of the rented [`Game`].
    pub game_id: game::Id,

    /// [`Date`] when the [`Game`] was rented.
    pub rent_date: RentDate,

    /// Number of days the [`Game`] is rented for.
    ///
    /// Fixed at creation.
    pub days_rented: DaysRented,

    /// Price agreed at creation: [`DaysRented`] times the [`Game`]'s price
    /// per day.
    ///
    /// Never changes afterwards, regardless of the actual return timing.
    pub original_price: Money,

    /// [`Date`] when the [`Game`] was returned.
    ///
    /// [`None`] means this [`Rental`] is still active.
    pub return_date: Option<ReturnDate>,

    /// Fee for returning the [`Game`] after the expected return date.
    ///
    /// Zero until this [`Rental`] is finalized, and stays zero if the
    /// [`Game`] is returned on time.
    pub delay_fee: Money,
}

impl Rental {
    /// Returns whether this [`Rental`] is active (not returned yet).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// Returns [`Status`] of this [`Rental`].
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_active() {
            Status::Active
        } else {
            Status::Finalized
        }
    }

    /// Returns the [`Date`] this [`Rental`] is expected to be returned on.
    #[must_use]
    pub fn expected_return_date(&self) -> ReturnDate {
        self.rent_date
            .plus_days(i64::from(self.days_rented.get()))
            .coerce()
    }

    /// Returns the delay fee for returning the [`Game`] on the provided
    /// [`Date`]: the number of whole calendar days past the
    /// [`expected_return_date()`], priced at the provided per-day price.
    ///
    /// The day count is clamped to zero before the multiplication, so
    /// returning on time (or early) is free.
    ///
    /// [`expected_return_date()`]: Rental::expected_return_date
    #[must_use]
    pub fn delay_fee_on(
        &self,
        returned_on: ReturnDate,
        price_per_day: Money,
    ) -> Money {
        let delay_days = self
            .expected_return_date()
            .whole_days_until(returned_on)
            .max(0);
        price_per_day * delay_days
    }
}

/// ID of a [`Rental`].
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

/// Number of days a [`Game`] is rented for.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct DaysRented(i32);

impl DaysRented {
    /// Creates a new [`DaysRented`] if the given number of `days` is
    /// positive.
    #[must_use]
    pub fn new(days: i32) -> Option<Self> {
        (days > 0).then_some(Self(days))
    }

    /// Returns the number of days of this [`DaysRented`].
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for DaysRented {
    type Error = &'static str;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        Self::new(days).ok_or("`DaysRented` must be positive")
    }
}

/// Status of a [`Rental`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Status {
    /// The [`Game`] is rented out and not returned yet.
    Active = 1,

    /// The [`Game`] is returned.
    Finalized = 2,
}

/// [`Date`] when a [`Rental`] was created.
pub type RentDate = DateOf<(Rental, unit::Creation)>;

/// Marker type indicating a [`Rental`] return.
#[derive(Clone, Copy, Debug)]
pub struct Return;

/// [`Date`] when a [`Rental`] was returned.
pub type ReturnDate = DateOf<(Rental, Return)>;

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::{customer, game};

    use super::{DaysRented, Id, Rental, Status};

    fn rental_on(rent_date: &str, days_rented: i32) -> Rental {
        let price_per_day = Money::new(1500).unwrap();
        Rental {
            id: Id::new(),
            customer_id: customer::Id::new(),
            game_id: game::Id::new(),
            rent_date: Date::from_iso8601(rent_date).unwrap().coerce(),
            days_rented: DaysRented::new(days_rented).unwrap(),
            original_price: price_per_day * i64::from(days_rented),
            return_date: None,
            delay_fee: Money::ZERO,
        }
    }

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    #[test]
    fn expected_return_date_adds_rented_days() {
        let rental = rental_on("2024-01-01", 3);

        assert_eq!(
            rental.expected_return_date(),
            date("2024-01-04").coerce(),
        );
    }

    #[test]
    fn delay_fee_charges_whole_overdue_days() {
        // Rented for 3 days on day 0 at 1500 per day, returned on day 5:
        // expected return on day 3, so 2 days of delay.
        let rental = rental_on("2024-01-01", 3);
        let price = Money::new(1500).unwrap();

        assert_eq!(
            rental.delay_fee_on(date("2024-01-06").coerce(), price),
            Money::new(3000).unwrap(),
        );
    }

    #[test]
    fn delay_fee_is_zero_on_time_or_early() {
        let rental = rental_on("2024-01-01", 3);
        let price = Money::new(1500).unwrap();

        for on_time in ["2024-01-04", "2024-01-03", "2024-01-01"] {
            assert_eq!(
                rental.delay_fee_on(date(on_time).coerce(), price),
                Money::ZERO,
                "returning on {on_time} must be free",
            );
        }
    }

    #[test]
    fn status_follows_return_date() {
        let mut rental = rental_on("2024-01-01", 3);
        assert!(rental.is_active());
        assert_eq!(rental.status(), Status::Active);

        rental.return_date = Some(date("2024-01-04").coerce());
        assert!(!rental.is_active());
        assert_eq!(rental.status(), Status::Finalized);
    }

    #[test]
    fn days_rented_requires_positive() {
        assert!(DaysRented::new(1).is_some());
        assert!(DaysRented::new(0).is_none());
        assert!(DaysRented::new(-3).is_none());
    }
}
