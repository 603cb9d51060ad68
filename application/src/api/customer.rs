//! [`Customer`]-related definitions.

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

/// A `Customer` renting games.
#[derive(Clone, Debug, From)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// [`domain::Customer`] representing this [`Customer`].
    customer: OnceCell<domain::Customer>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        Self {
            id: customer.id.into(),
            customer: OnceCell::new_with(Some(customer)),
        }
    }
}

impl Customer {
    /// Creates a new [`Customer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Customer`] with the provided ID exists,
    /// otherwise accessing this [`Customer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            customer: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Customer`] representing this [`Customer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Customer`] doesn't exist.
    async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Customer, Error> {
        let id = self.id.into();
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CustomerError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Customer` renting games.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.name.clone().into())
    }

    /// Phone number of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Phone, Error> {
        Ok(self.customer(ctx).await?.phone.clone().into())
    }

    /// CPF of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.cpf",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cpf(&self, ctx: &Context) -> Result<Cpf, Error> {
        Ok(self.customer(ctx).await?.cpf.clone().into())
    }

    /// `DateTime` when this `Customer` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.customer(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Customer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

/// Name of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// Phone number of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerPhone",
    with = scalar::Via::<domain::customer::Phone>,
)]
pub struct Phone(domain::customer::Phone);

/// CPF (Brazilian national ID) of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerCpf",
    with = scalar::Via::<domain::customer::Cpf>,
)]
pub struct Cpf(domain::customer::Cpf);

pub mod list {
    //! Definitions related to [`Customer`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use crate::{api::scalar, Context};

    use super::{Customer, Id};

    /// Cursor for the `Customer` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::customer::list::Cursor)]
    #[graphql(
        name = "CustomerListCursor",
        with = scalar::Via::<read::customer::list::Cursor>,
    )]
    pub struct Cursor(pub read::customer::list::Cursor);

    /// Edge in the [`Customer`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::customer::list::Edge);

    /// Edge in the `Customer` list.
    #[graphql_object(name = "CustomerListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `CustomerListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `CustomerListEdge`.
        #[must_use]
        pub fn node(&self) -> Customer {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Customer` existence"
            )]
            unsafe {
                Customer::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Customer`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::customer::list::Connection);

    /// Connection of the `Customer` list.
    #[graphql_object(name = "CustomerListConnection", context = Context)]
    impl Connection {
        /// Edges in this `CustomerListConnection`.
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
        /// Underlying [`read::customer::list::PageInfo`].
        info: read::customer::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `CustomerListConnection` page.
    #[graphql_object(name = "CustomerListPageInfo", context = Context)]
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
