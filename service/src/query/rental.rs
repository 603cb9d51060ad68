//! [`Query`] collection related to a single [`Rental`].

use common::operations::By;

use crate::domain::{rental, Rental};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Rental`] by its [`rental::Id`].
pub type ById = DatabaseQuery<By<Option<Rental>, rental::Id>>;
