//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

/// Default number of edges returned by list queries.
const DEFAULT_PAGE_SIZE: i32 = 10;

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Customer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(query::customer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CustomerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Customer`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "customers",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(
        first: Option<i32>,
        after: Option<api::customer::list::Cursor>,
        last: Option<i32>,
        before: Option<api::customer::list::Cursor>,
        name: Option<api::customer::Name>,
        ctx: &Context,
    ) -> Result<api::customer::list::Connection, Error> {
        let arguments = read::customer::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::customers::List::by(
                read::customer::list::Selector {
                    arguments,
                    filter: read::customer::list::Filter {
                        name: name.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the total count of `Customer`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customersTotalCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers_total_count(ctx: &Context) -> Result<i32, Error> {
        ctx.service()
            .execute(query::customers::TotalCount::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Game` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `GAME_NOT_EXISTS` - the `Game` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "game",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn game(
        id: api::game::Id,
        ctx: &Context,
    ) -> Result<api::Game, Error> {
        ctx.service()
            .execute(query::game::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| GameError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Game`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "games",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn games(
        first: Option<i32>,
        after: Option<api::game::list::Cursor>,
        last: Option<i32>,
        before: Option<api::game::list::Cursor>,
        name: Option<api::game::Name>,
        ctx: &Context,
    ) -> Result<api::game::list::Connection, Error> {
        let arguments = read::game::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::games::List::by(read::game::list::Selector {
                arguments,
                filter: read::game::list::Filter {
                    name: name.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the total count of `Game`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "gamesTotalCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn games_total_count(ctx: &Context) -> Result<i32, Error> {
        ctx.service()
            .execute(query::games::TotalCount::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Rental` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "rental",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rental(
        id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::Rental, Error> {
        ctx.service()
            .execute(query::rental::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| RentalError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Rental`s, optionally narrowed down to a single
    /// `Customer` or `Game`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            customer_id = ?customer_id.as_ref().map(ToString::to_string),
            first = ?first,
            game_id = ?game_id.as_ref().map(ToString::to_string),
            gql.name = "rentals",
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rentals(
        first: Option<i32>,
        after: Option<api::rental::list::Cursor>,
        last: Option<i32>,
        before: Option<api::rental::list::Cursor>,
        customer_id: Option<api::customer::Id>,
        game_id: Option<api::game::Id>,
        ctx: &Context,
    ) -> Result<api::rental::list::Connection, Error> {
        let arguments = read::rental::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::rentals::List::by(read::rental::list::Selector {
                arguments,
                filter: read::rental::list::Filter {
                    customer_id: customer_id.map(Into::into),
                    game_id: game_id.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the total count of `Rental`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rentalsTotalCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rentals_total_count(ctx: &Context) -> Result<i32, Error> {
        ctx.service()
            .execute(query::rentals::TotalCount::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum GameError {
        #[code = "GAME_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Game` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RentalError {
        #[code = "RENTAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rental` with the specified ID does not exist"]
        NotExists,
    }
}
