//! [`Command`] for finalizing a [`Rental`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{game, rental, Game, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for finalizing a [`Rental`]: the [`Game`] is returned, and the
/// delay fee (if any) is charged.
#[derive(Clone, Copy, Debug)]
pub struct FinalizeRental {
    /// ID of the [`Rental`] to be finalized.
    pub rental_id: rental::Id,
}

impl<Db> Command<FinalizeRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Rental, rental::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Game>, game::Id>>,
            Ok = Option<Game>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: FinalizeRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let FinalizeRental { rental_id } = cmd;

        self.database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent finalizations of the same `Rental`.
        tx.execute(Lock(By::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        if rental.return_date.is_some() {
            return Err(tracerr::new!(E::RentalAlreadyFinalized(rental_id)));
        }

        let game = tx
            .execute(Select(By::<Option<Game>, _>::new(rental.game_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::GameNotExists(rental.game_id))
            .map_err(tracerr::wrap!())?;

        let returned_on = Date::today().coerce();
        rental.delay_fee =
            rental.delay_fee_on(returned_on, Money::from(game.price_per_day));
        rental.return_date = Some(returned_on);

        tx.execute(Update(rental.clone()))
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

/// Error of [`FinalizeRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Game`] referenced by the [`Rental`] does not exist.
    #[display("`Game(id: {_0})` does not exist")]
    GameNotExists(#[error(not(source))] game::Id),

    /// [`Rental`] is already finalized.
    #[display("`Rental(id: {_0})` is already finalized")]
    RentalAlreadyFinalized(#[error(not(source))] rental::Id),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::{domain::rental, testing};

    use super::{Command as _, ExecutionError, FinalizeRental};

    #[tokio::test]
    async fn returning_on_time_is_free() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;
        let rental =
            testing::given_rental(&service, &customer, &game, 0, 3).await;

        let finalized = service
            .execute(FinalizeRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();

        assert_eq!(finalized.return_date, Some(Date::today().coerce()));
        assert_eq!(finalized.delay_fee, Money::ZERO);
        assert_eq!(finalized.original_price, rental.original_price);
    }

    #[tokio::test]
    async fn overdue_return_charges_delay_fee() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1500).await;
        // Rented 5 days ago for 3 days: 2 days overdue by now.
        let rental =
            testing::given_rental(&service, &customer, &game, -5, 3).await;

        let finalized = service
            .execute(FinalizeRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();

        assert_eq!(finalized.delay_fee, Money::new(3000).unwrap());
        assert_eq!(finalized.original_price, rental.original_price);
    }

    #[tokio::test]
    async fn finalization_is_one_way() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;
        let rental =
            testing::given_rental(&service, &customer, &game, 0, 3).await;

        let finalized = service
            .execute(FinalizeRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();

        let err = service
            .execute(FinalizeRental {
                rental_id: rental.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RentalAlreadyFinalized(_),
        ));

        // The failed call must not have touched the stored `Rental`.
        let stored = testing::stored_rental(&service, rental.id).await;
        assert_eq!(stored.return_date, finalized.return_date);
        assert_eq!(stored.delay_fee, finalized.delay_fee);
    }

    #[tokio::test]
    async fn rejects_unknown_rental() {
        let service = testing::service();

        let err = service
            .execute(FinalizeRental {
                rental_id: rental::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::RentalNotExists(_)));
    }
}
