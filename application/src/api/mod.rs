//! GraphQL API definitions.

pub mod customer;
pub mod game;
mod mutation;
mod query;
pub mod rental;
pub mod scalar;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    customer::Customer, game::Game, mutation::Mutation, query::Query,
    rental::Rental,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
