//! [`Query`] collection related to a single [`Game`].

use common::operations::By;

use crate::domain::{game, Game};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Game`] by its [`game::Id`].
pub type ById = DatabaseQuery<By<Option<Game>, game::Id>>;
