//! [`Money`]-related definitions.

use std::{fmt, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Amount of money in the smallest currency unit (e.g. cents).
///
/// Stored as a plain integer to keep all the arithmetic exact.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(i64);

impl Money {
    /// [`Money`] of a zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a new [`Money`] if the given amount of `units` is not negative.
    #[must_use]
    pub fn new(units: i64) -> Option<Self> {
        (units >= 0).then_some(Self(units))
    }

    /// Returns the amount of this [`Money`] in the smallest currency units.
    #[must_use]
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Indicates whether this [`Money`] is a zero amount.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units = i64::from_str(s).map_err(|_| "invalid amount")?;
        Self::new(units).ok_or("negative amount")
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative amount of money in the smallest currency unit,
    /// in `{units}` format, where `units` is an integer.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Money;

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("1500").unwrap(), Money::new(1500).unwrap());
        assert_eq!(Money::from_str("0").unwrap(), Money::ZERO);

        assert!(Money::from_str("-1").is_err());
        assert!(Money::from_str("15.00").is_err());
        assert!(Money::from_str("15USD").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Money::new(1500).unwrap().to_string(), "1500");
        assert_eq!(Money::ZERO.to_string(), "0");
    }

    #[test]
    fn arithmetic() {
        let price = Money::new(1500).unwrap();

        assert_eq!(price * 3, Money::new(4500).unwrap());
        assert_eq!(price * 0, Money::ZERO);
        assert_eq!(price + Money::new(500).unwrap(), Money::new(2000).unwrap());
    }

    #[test]
    fn rejects_negative() {
        assert_eq!(Money::new(-1), None);
        assert!(Money::new(0).is_some());
    }
}
