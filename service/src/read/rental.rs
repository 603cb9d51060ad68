//! [`Rental`] read model definition.
//!
//! [`Rental`]: crate::domain::Rental

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::{Game, Rental};

/// Number of active [`Rental`]s of a single [`Game`].
///
/// Admission control for new [`Rental`]s compares it against the [`Game`]'s
/// stock total.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct ActiveCount(i64);

pub mod list {
    //! [`Rental`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{customer, game, rental};
    #[cfg(doc)]
    use crate::domain::{Customer, Game, Rental};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = rental::Id;

    /// Cursor pointing to a specific [`Rental`] in a list.
    pub type Cursor = rental::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Customer`] to list [`Rental`]s of.
        pub customer_id: Option<customer::Id>,

        /// ID of the [`Game`] to list [`Rental`]s of.
        pub game_id: Option<game::Id>,
    }

    /// Total count of [`Rental`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
