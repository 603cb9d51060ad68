//! [`Command`] for creating a new [`Customer`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::customer::{Cpf, Name, Phone};
use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// [`Name`] of a new [`Customer`].
    pub name: customer::Name,

    /// [`Phone`] of a new [`Customer`].
    pub phone: customer::Phone,

    /// [`Cpf`] of a new [`Customer`].
    pub cpf: customer::Cpf,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: for<'c> Database<
            Select<By<Option<Customer>, &'c customer::Cpf>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer { name, phone, cpf } = cmd;

        let c = self
            .database()
            .execute(Select(By::new(&cpf)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if c.is_some() {
            return Err(tracerr::new!(E::CpfAlreadyRegistered(cpf)));
        }

        let customer = Customer {
            id: customer::Id::new(),
            name,
            phone,
            cpf,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`customer::Cpf`] is already registered.
    #[display("`Customer` with `{_0}` CPF is already registered")]
    CpfAlreadyRegistered(#[error(not(source))] customer::Cpf),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use crate::testing;

    use super::{Command as _, CreateCustomer, ExecutionError};

    #[test]
    fn errors() {
        assert_eq!(
            ExecutionError::CpfAlreadyRegistered(testing::cpf("12345678901"))
                .to_string(),
            "`Customer` with `12345678901` CPF is already registered",
        );
    }

    #[tokio::test]
    async fn creates_customer() {
        let service = testing::service();

        let customer = service
            .execute(CreateCustomer {
                name: testing::customer_name("Ann"),
                phone: testing::phone("11999999999"),
                cpf: testing::cpf("12345678901"),
            })
            .await
            .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&customer.name), "Ann");
        assert_eq!(AsRef::<str>::as_ref(&customer.phone), "11999999999");
        assert_eq!(AsRef::<str>::as_ref(&customer.cpf), "12345678901");
        assert!(testing::customer_exists(&service, customer.id).await);
    }

    #[tokio::test]
    async fn rejects_duplicate_cpf() {
        let service = testing::service();

        let first = service
            .execute(CreateCustomer {
                name: testing::customer_name("Ann"),
                phone: testing::phone("11999999999"),
                cpf: testing::cpf("12345678901"),
            })
            .await
            .unwrap();

        let err = service
            .execute(CreateCustomer {
                name: testing::customer_name("Bob"),
                phone: testing::phone("1188888888"),
                cpf: testing::cpf("12345678901"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CpfAlreadyRegistered(_),
        ));
        assert!(testing::customer_exists(&service, first.id).await);
    }
}
