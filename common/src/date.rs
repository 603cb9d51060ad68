//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::macros::format_description;

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without a time-of-day component.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current date in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] (`YYYY-MM-DD`)
    /// string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, format_description!("[year]-[month]-[day]"))
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
            .map_err(ParseError)
    }

    /// Returns the [`Date`] as an [ISO 8601] (`YYYY-MM-DD`) string.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.inner
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|e| {
                panic!("cannot format `Date` as ISO 8601: {e}")
            })
    }

    /// Returns the [`Date`] being the provided number of whole calendar
    /// `days` after this one.
    #[expect(clippy::missing_panics_doc, reason = "unrepresentable dates")]
    #[must_use]
    pub fn plus_days(self, days: i64) -> Self {
        Self {
            inner: self
                .inner
                .checked_add(time::Duration::days(days))
                .expect("`Date` overflow"),
            _of: PhantomData,
        }
    }

    /// Returns the number of whole calendar days from this [`Date`] until the
    /// provided one.
    ///
    /// Negative if the provided [`Date`] is before this one.
    #[must_use]
    pub fn whole_days_until<NewOf: ?Sized>(
        self,
        other: DateOf<NewOf>,
    ) -> i64 {
        (other.inner - self.inner).whole_days()
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateOf<Of> {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateOf<Of> {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in [ISO 8601] (`YYYY-MM-DD`) format.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = crate::Date;

    impl Date {
        fn to_output<S: ScalarValue>(date: &Date) -> Value<S> {
            Value::scalar(date.to_iso8601())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso8601(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_and_formats_iso8601() {
        let date = Date::from_iso8601("2024-02-28").unwrap();
        assert_eq!(date.to_iso8601(), "2024-02-28");

        assert!(Date::from_iso8601("2024-02-30").is_err());
        assert!(Date::from_iso8601("28.02.2024").is_err());
        assert!(Date::from_iso8601("").is_err());
    }

    #[test]
    fn adds_whole_days() {
        let date = Date::from_iso8601("2024-02-28").unwrap();

        // 2024 is a leap year.
        assert_eq!(date.plus_days(2).to_iso8601(), "2024-03-01");
        assert_eq!(date.plus_days(0), date);
    }

    #[test]
    fn counts_whole_days() {
        let from = Date::from_iso8601("2024-12-30").unwrap();
        let to = Date::from_iso8601("2025-01-02").unwrap();

        assert_eq!(from.whole_days_until(to), 3);
        assert_eq!(to.whole_days_until(from), -3);
        assert_eq!(from.whole_days_until(from), 0);
    }
}
