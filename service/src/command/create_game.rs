//! [`Command`] for adding a new [`Game`] to the catalog.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::game::{ImageUrl, Name, PricePerDay, StockTotal};
use crate::{
    domain::{game, Game},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Game`] to the catalog.
#[derive(Clone, Debug)]
pub struct CreateGame {
    /// [`Name`] of a new [`Game`].
    pub name: game::Name,

    /// [`ImageUrl`] of a new [`Game`].
    pub image: game::ImageUrl,

    /// [`StockTotal`] of a new [`Game`].
    pub stock_total: game::StockTotal,

    /// [`PricePerDay`] of a new [`Game`].
    pub price_per_day: game::PricePerDay,
}

impl<Db> Command<CreateGame> for Service<Db>
where
    Db: for<'n> Database<
            Select<By<Option<Game>, &'n game::Name>>,
            Ok = Option<Game>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Game>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Game;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateGame) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateGame {
            name,
            image,
            stock_total,
            price_per_day,
        } = cmd;

        let g = self
            .database()
            .execute(Select(By::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if g.is_some() {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let game = Game {
            id: game::Id::new(),
            name,
            image,
            stock_total,
            price_per_day,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(game.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(game)
    }
}

/// Error of [`CreateGame`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`game::Name`] is already registered.
    #[display("`Game` with `{_0}` name is already registered")]
    NameOccupied(#[error(not(source))] game::Name),
}

#[cfg(test)]
mod spec {
    use crate::testing;

    use super::{Command as _, CreateGame, ExecutionError};

    #[tokio::test]
    async fn creates_game() {
        let service = testing::service();

        let game = service
            .execute(CreateGame {
                name: testing::game_name("Chess"),
                image: testing::image("https://example.com/chess.png"),
                stock_total: testing::stock(3),
                price_per_day: testing::price(1500),
            })
            .await
            .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&game.name), "Chess");
        assert_eq!(game.stock_total.get(), 3);
        assert!(testing::game_exists(&service, game.id).await);
    }

    #[tokio::test]
    async fn rejects_duplicate_name() {
        let service = testing::service();

        let first = service
            .execute(CreateGame {
                name: testing::game_name("Chess"),
                image: testing::image("https://example.com/chess.png"),
                stock_total: testing::stock(3),
                price_per_day: testing::price(1500),
            })
            .await
            .unwrap();

        let err = service
            .execute(CreateGame {
                name: testing::game_name("Chess"),
                image: testing::image("https://example.com/other.png"),
                stock_total: testing::stock(1),
                price_per_day: testing::price(1000),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NameOccupied(_)));
        assert!(testing::game_exists(&service, first.id).await);
    }
}
