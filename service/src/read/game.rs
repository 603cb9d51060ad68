//! [`Game`] read model definition.
//!
//! [`Game`]: crate::domain::Game

pub mod list {
    //! [`Game`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::game;
    #[cfg(doc)]
    use crate::domain::Game;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = game::Id;

    /// Cursor pointing to a specific [`Game`] in a list.
    pub type Cursor = game::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`game::Name`] (or its part) to fuzzy search for.
        pub name: Option<game::Name>,
    }

    /// Total count of [`Game`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
