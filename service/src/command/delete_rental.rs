//! [`Command`] for deleting a finalized [`Rental`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a finalized [`Rental`] permanently.
///
/// Active [`Rental`]s cannot be deleted: they have to be finalized first.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRental {
    /// ID of the [`Rental`] to be deleted.
    pub rental_id: rental::Id,
}

impl<Db> Command<DeleteRental> for Service<Db>
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
        > + Database<Delete<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRental { rental_id } = cmd;

        let rental = self
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;
        if rental.is_active() {
            return Err(tracerr::new!(E::RentalNotFinalized(rental_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing a concurrent finalization or deletion.
        tx.execute(Lock(By::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;
        if rental.is_active() {
            return Err(tracerr::new!(E::RentalNotFinalized(rental_id)));
        }

        tx.execute(Delete(rental.clone()))
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

/// Error of [`DeleteRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Rental`] is still active.
    #[display("`Rental(id: {_0})` is not finalized yet")]
    RentalNotFinalized(#[error(not(source))] rental::Id),
}

#[cfg(test)]
mod spec {
    use crate::{domain::rental, testing};

    use super::{Command as _, DeleteRental, ExecutionError};

    #[tokio::test]
    async fn rejects_active_rental() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;
        let rental =
            testing::given_rental(&service, &customer, &game, 0, 3).await;

        let err = service
            .execute(DeleteRental {
                rental_id: rental.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RentalNotFinalized(_),
        ));
        assert_eq!(testing::rental_count(&service).await, 1);
    }

    #[tokio::test]
    async fn deletes_finalized_rental() {
        let service = testing::service();
        let customer = testing::given_customer(&service, "12345678901").await;
        let game = testing::given_game(&service, "Chess", 1, 1000).await;
        let rental =
            testing::given_rental(&service, &customer, &game, 0, 3).await;
        testing::given_returned(&service, rental.clone()).await;

        let deleted = service
            .execute(DeleteRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();

        assert_eq!(deleted.id, rental.id);
        assert_eq!(testing::rental_count(&service).await, 0);
    }

    #[tokio::test]
    async fn rejects_unknown_rental() {
        let service = testing::service();

        let err = service
            .execute(DeleteRental {
                rental_id: rental::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::RentalNotExists(_)));
    }
}
