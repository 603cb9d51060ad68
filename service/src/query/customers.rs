//! [`Query`] collection related to the multiple [`Customer`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Customer, Query};

use super::DatabaseQuery;

/// Queries a list of [`Customer`]s.
pub type List = DatabaseQuery<
    By<read::customer::list::Page, read::customer::list::Selector>,
>;

/// Queries total count of [`Customer`]s.
pub type TotalCount = DatabaseQuery<By<read::customer::list::TotalCount, ()>>;
