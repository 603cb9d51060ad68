//! [`Game`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A board `Game` available for rent.
#[derive(Clone, Debug, From)]
pub struct Game {
    /// ID of this [`Game`].
    pub id: Id,

    /// [`domain::Game`] representing this [`Game`].
    game: OnceCell<domain::Game>,
}

impl From<domain::Game> for Game {
    fn from(game: domain::Game) -> Self {
        Self {
            id: game.id.into(),
            game: OnceCell::new_with(Some(game)),
        }
    }
}

impl Game {
    /// Creates a new [`Game`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Game`] with the provided ID exists,
    /// otherwise accessing this [`Game`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            game: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Game`] representing this [`Game`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Game`] doesn't exist.
    async fn game(&self, ctx: &Context) -> Result<&domain::Game, Error> {
        let id = self.id.into();
        self.game
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::game::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|g| {
                        future::ready(g.ok_or_else(|| {
                            api::query::GameError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A board `Game` available for rent.
#[graphql_object(context = Context)]
impl Game {
    /// Unique identifier of this `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.game(ctx).await?.name.clone().into())
    }

    /// URL of this `Game` image.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.image",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn image(&self, ctx: &Context) -> Result<Image, Error> {
        Ok(self.game(ctx).await?.image.clone().into())
    }

    /// Total number of physical copies of this `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.stockTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn stock_total(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.game(ctx).await?.stock_total.get())
    }

    /// Daily rental price of this `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.pricePerDay",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price_per_day(
        &self,
        ctx: &Context,
    ) -> Result<PricePerDay, Error> {
        Ok(self.game(ctx).await?.price_per_day.into())
    }

    /// Number of currently active rentals of this `Game`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.rentedCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rented_count(&self, ctx: &Context) -> Result<i32, Error> {
        let count: i64 = ctx
            .service()
            .execute(query::rentals::ActiveCountByGame::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into();
        count.try_into().map_err(AsError::into_error)
    }

    /// Number of copies of this `Game` available for rent right now.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.available",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn available(&self, ctx: &Context) -> Result<i32, Error> {
        let stock = self.game(ctx).await?.stock_total.get();
        let rented: i64 = ctx
            .service()
            .execute(query::rentals::ActiveCountByGame::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into();
        let rented: i32 = rented.try_into().map_err(AsError::into_error)?;
        Ok((stock - rented).max(0))
    }

    /// `DateTime` when this `Game` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Game.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.game(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Game`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::game::Id)]
#[into(domain::game::Id)]
#[graphql(name = "GameId", transparent)]
pub struct Id(Uuid);

/// Name of a `Game`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GameName",
    with = scalar::Via::<domain::game::Name>,
)]
pub struct Name(domain::game::Name);

/// URL of a `Game` image.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GameImageUrl",
    with = scalar::Via::<domain::game::ImageUrl>,
)]
pub struct Image(domain::game::ImageUrl);

/// Daily rental price of a `Game`, in the smallest currency unit.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "GamePricePerDay",
    with = scalar::Via::<domain::game::PricePerDay>,
)]
pub struct PricePerDay(domain::game::PricePerDay);

pub mod list {
    //! Definitions related to [`Game`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use crate::{api::scalar, Context};

    use super::{Game, Id};

    /// Cursor for the `Game` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::game::list::Cursor)]
    #[graphql(
        name = "GameListCursor",
        with = scalar::Via::<read::game::list::Cursor>,
    )]
    pub struct Cursor(pub read::game::list::Cursor);

    /// Edge in the [`Game`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::game::list::Edge);

    /// Edge in the `Game` list.
    #[graphql_object(name = "GameListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `GameListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `GameListEdge`.
        #[must_use]
        pub fn node(&self) -> Game {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Game` \
                          existence"
            )]
            unsafe {
                Game::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Game`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::game::list::Connection);

    /// Connection of the `Game` list.
    #[graphql_object(name = "GameListConnection", context = Context)]
    impl Connection {
        /// Edges in this `GameListConnection`.
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
        /// Underlying [`read::game::list::PageInfo`].
        info: read::game::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `GameListConnection` page.
    #[graphql_object(name = "GameListPageInfo", context = Context)]
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
