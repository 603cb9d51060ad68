//! [`Query`] collection related to the multiple [`Rental`]s.

use common::operations::By;

use crate::{domain::game, read};
#[cfg(doc)]
use crate::{
    domain::{Game, Rental},
    Query,
};

use super::DatabaseQuery;

/// Queries a list of [`Rental`]s.
pub type List =
    DatabaseQuery<By<read::rental::list::Page, read::rental::list::Selector>>;

/// Queries total count of [`Rental`]s.
pub type TotalCount = DatabaseQuery<By<read::rental::list::TotalCount, ()>>;

/// Queries the number of active [`Rental`]s of a [`Game`].
pub type ActiveCountByGame =
    DatabaseQuery<By<read::rental::ActiveCount, game::Id>>;
