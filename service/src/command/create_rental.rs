//! [`Command`] for renting a [`Game`] out to a [`Customer`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::rental::DaysRented;
use crate::{
    domain::{customer, game, rental, Customer, Game, Rental},
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for renting a [`Game`] out to a [`Customer`].
#[derive(Clone, Copy, Debug)]
pub struct CreateRental {
    /// ID of the [`Customer`] renting the [`Game`].
    pub customer_id: customer::Id,

    /// ID of the [`Game`] to rent out.
    pub game_id: game::Id,

    /// [`DaysRented`] of a new [`Rental`].
    pub days_rented: rental::DaysRented,
}

impl<Db> Command<CreateRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Game>, game::Id>>,
            Ok = Option<Game>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Game, game::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::rental::ActiveCount, game::Id>>,
            Ok = read::rental::ActiveCount,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRental {
            customer_id,
            game_id,
            days_rented,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let game = self
            .database()
            .execute(Select(By::<Option<Game>, _>::new(game_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::GameNotExists(game_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid overselling the `Game` stock under concurrent rentals.
        tx.execute(Lock(By::new(game.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let active = tx
            .execute(Select(By::<read::rental::ActiveCount, _>::new(game.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if i64::from(active) >= i64::from(game.stock_total.get()) {
            return Err(tracerr::new!(E::NoStockAvailable(game.id)));
        }

        let rental = Rental {
            id: rental::Id::new(),
            customer_id: customer.id,
            game_id: game.id,
            rent_date: Date::today().coerce(),
            days_rented,
            original_price: Money::from(game.price_per_day)
                * i64::from(days_rented.get()),
            return_date: None,
            delay_fee: Money::ZERO,
        };
        tx.execute(Insert(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rental)
    }
}

/// Error of [`CreateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Game`] with the provided ID does not exist.
    #[display("`Game(id: {_0})` does not exist")]
    GameNotExists(#[error(not(source))] game::Id),

    /// All copies of the [`Game`] are rented out already.
    #[display("`Game(id: {_0})` has no stock available")]
    NoStockAvailable(#[error(not(source))] game::Id),
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::{domain::game, testing};

    use super::{Command as _, CreateRental, ExecutionError};

    #[tokio::test]
    async fn creates_active_rental_with_original_price() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;

        let rental = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(2),
            })
            .await
            .unwrap();

        assert_eq!(rental.customer_id, customer.id);
        assert_eq!(rental.game_id, game.id);
        assert_eq!(rental.rent_date, Date::today().coerce());
        assert_eq!(rental.original_price, Money::new(2000).unwrap());
        assert!(rental.return_date.is_none());
        assert_eq!(rental.delay_fee, Money::ZERO);
    }

    #[tokio::test]
    async fn rejects_unknown_customer_without_writes() {
        let service = testing::service();
        let game = testing::given_game(&service, "Chess", 1, 1000).await;

        let err = service
            .execute(CreateRental {
                customer_id: crate::domain::customer::Id::new(),
                game_id: game.id,
                days_rented: testing::days(2),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CustomerNotExists(_),
        ));
        assert_eq!(testing::rental_count(&service).await, 0);
    }

    #[tokio::test]
    async fn rejects_unknown_game_without_writes() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;

        let err = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game::Id::new(),
                days_rented: testing::days(2),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::GameNotExists(_)));
        assert_eq!(testing::rental_count(&service).await, 0);
    }

    #[tokio::test]
    async fn admits_at_most_stock_total_active_rentals() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 2, 1000).await;

        for _ in 0..2 {
            let _ = service
                .execute(CreateRental {
                    customer_id: customer.id,
                    game_id: game.id,
                    days_rented: testing::days(3),
                })
                .await
                .unwrap();
        }

        let err = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(3),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoStockAvailable(_)));
        assert_eq!(testing::rental_count(&service).await, 2);
    }

    #[tokio::test]
    async fn finalized_rentals_free_stock() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;

        let first = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(3),
            })
            .await
            .unwrap();
        testing::given_returned(&service, first).await;

        let second = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(3),
            })
            .await;
        assert!(second.is_ok());
    }
}
