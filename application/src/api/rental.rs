//! [`Rental`]-related definitions.

use std::future;

use common::{Date, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A `Rental` of a `Game` by a `Customer`.
#[derive(Clone, Debug, From)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// [`domain::Rental`] representing this [`Rental`].
    rental: OnceCell<domain::Rental>,

    /// `Customer` renting the `Game`.
    customer: OnceCell<api::Customer>,

    /// Rented `Game`.
    game: OnceCell<api::Game>,
}

impl From<domain::Rental> for Rental {
    fn from(rental: domain::Rental) -> Self {
        Self {
            id: rental.id.into(),
            rental: OnceCell::new_with(Some(rental)),
            customer: OnceCell::new(),
            game: OnceCell::new(),
        }
    }
}

impl Rental {
    /// Creates a new [`Rental`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Rental`] with the provided ID exists,
    /// otherwise accessing this [`Rental`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            rental: OnceCell::new(),
            customer: OnceCell::new(),
            game: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Rental`] representing this [`Rental`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Rental`] doesn't exist.
    async fn rental(&self, ctx: &Context) -> Result<&domain::Rental, Error> {
        let id = self.id.into();
        self.rental
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::rental::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::RentalError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Rental` of a `Game` by a `Customer`.
#[graphql_object(context = Context)]
impl Rental {
    /// Unique identifier of this `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Customer` renting the `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&api::Customer, Error> {
        let id = self.rental(ctx).await?.customer_id;
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.map_or_else(
                            || {
                                Err(api::query::CustomerError::NotExists
                                    .into())
                            },
                            |c| Ok(c.into()),
                        ))
                    })
            })
            .await
    }

    /// Rented `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.game",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn game(&self, ctx: &Context) -> Result<&api::Game, Error> {
        let id = self.rental(ctx).await?.game_id;
        self.game
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::game::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|g| {
                        future::ready(g.map_or_else(
                            || Err(api::query::GameError::NotExists.into()),
                            |g| Ok(g.into()),
                        ))
                    })
            })
            .await
    }

    /// `Date` when the `Game` was rented.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.rentDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rent_date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.rental(ctx).await?.rent_date.coerce())
    }

    /// Number of days the `Game` is rented for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.daysRented",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn days_rented(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.rental(ctx).await?.days_rented.get())
    }

    /// Price agreed at this `Rental` creation, in the smallest currency
    /// unit.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.originalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn original_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.rental(ctx).await?.original_price)
    }

    /// `Date` when the `Game` was returned.
    ///
    /// `null` means this `Rental` is still active.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.returnDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn return_date(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self.rental(ctx).await?.return_date.map(|date| date.coerce()))
    }

    /// `Date` this `Rental` is expected to be returned on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.expectedReturnDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn expected_return_date(
        &self,
        ctx: &Context,
    ) -> Result<Date, Error> {
        Ok(self.rental(ctx).await?.expected_return_date().coerce())
    }

    /// Fee charged for returning the `Game` late, in the smallest currency
    /// unit.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.delayFee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn delay_fee(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.rental(ctx).await?.delay_fee)
    }

    /// Status of this `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.rental(ctx).await?.status().into())
    }
}

/// Unique identifier of a `Rental`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::rental::Id)]
#[into(domain::rental::Id)]
#[graphql(name = "RentalId", transparent)]
pub struct Id(Uuid);

/// Status of a `Rental`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "RentalStatus")]
pub enum Status {
    /// The `Game` is rented out and not returned yet.
    Active,

    /// The `Game` is returned.
    Finalized,
}

impl From<domain::rental::Status> for Status {
    fn from(status: domain::rental::Status) -> Self {
        match status {
            domain::rental::Status::Active => Self::Active,
            domain::rental::Status::Finalized => Self::Finalized,
        }
    }
}

pub mod list {
    //! Definitions related to [`Rental`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use crate::{api::scalar, Context};

    use super::{Id, Rental};

    /// Cursor for the `Rental` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::rental::list::Cursor)]
    #[graphql(
        name = "RentalListCursor",
        with = scalar::Via::<read::rental::list::Cursor>,
    )]
    pub struct Cursor(pub read::rental::list::Cursor);

    /// Edge in the [`Rental`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::rental::list::Edge);

    /// Edge in the `Rental` list.
    #[graphql_object(name = "RentalListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `RentalListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `RentalListEdge`.
        #[must_use]
        pub fn node(&self) -> Rental {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Rental` \
                          existence"
            )]
            unsafe {
                Rental::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Rental`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::rental::list::Connection);

    /// Connection of the `Rental` list.
    #[graphql_object(name = "RentalListConnection", context = Context)]
    impl Connection {
        /// Edges in this `RentalListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::rental::list::PageInfo`].
        info: read::rental::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `RentalListConnection` page.
    #[graphql_object(name = "RentalListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }
    }
}
