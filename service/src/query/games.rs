//! [`Query`] collection related to the multiple [`Game`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Game, Query};

use super::DatabaseQuery;

/// Queries a list of [`Game`]s.
pub type List =
    DatabaseQuery<By<read::game::list::Page, read::game::list::Selector>>;

/// Queries total count of [`Game`]s.
pub type TotalCount = DatabaseQuery<By<read::game::list::TotalCount, ()>>;
