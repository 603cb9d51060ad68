//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain, infra::database, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Customer` with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CPF_ALREADY_REGISTERED` - a `Customer` with the provided
    ///                              `CustomerCpf` is already registered.
    #[tracing::instrument(
        skip_all,
        fields(
            cpf = %cpf,
            gql.name = "createCustomer",
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = %phone,
        ),
    )]
    pub async fn create_customer(
        name: api::customer::Name,
        phone: api::customer::Phone,
        cpf: api::customer::Cpf,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::CreateCustomer {
                name: name.into(),
                phone: phone.into(),
                cpf: cpf.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Game` to the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `GAME_NAME_OCCUPIED` - a `Game` with the provided `GameName` is
    ///                          already registered;
    /// - `INVALID_STOCK_TOTAL` - the provided `stockTotal` is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createGame",
            image = %image,
            name = %name,
            otel.name = Self::SPAN_NAME,
            price_per_day = %price_per_day,
            stock_total = %stock_total,
        ),
    )]
    pub async fn create_game(
        name: api::game::Name,
        image: api::game::Image,
        stock_total: i32,
        price_per_day: api::game::PricePerDay,
        ctx: &Context,
    ) -> Result<api::Game, Error> {
        let stock_total = domain::game::StockTotal::new(stock_total)
            .ok_or_else(|| Error::from(GameError::InvalidStockTotal))
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateGame {
                name: name.into(),
                image: image.into(),
                stock_total,
                price_per_day: price_per_day.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rents a `Game` out to a `Customer` for the provided number of days.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the provided ID does
    ///                           not exist;
    /// - `GAME_NOT_EXISTS` - the `Game` with the provided ID does not exist;
    /// - `INVALID_DAYS_RENTED` - the provided `daysRented` is not positive;
    /// - `NO_STOCK_AVAILABLE` - all copies of the `Game` are rented out.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            days_rented = %days_rented,
            game_id = %game_id,
            gql.name = "createRental",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_rental(
        customer_id: api::customer::Id,
        game_id: api::game::Id,
        days_rented: i32,
        ctx: &Context,
    ) -> Result<api::Rental, Error> {
        let days_rented = domain::rental::DaysRented::new(days_rented)
            .ok_or_else(|| Error::from(RentalError::InvalidDaysRented))
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateRental {
                customer_id: customer_id.into(),
                game_id: game_id.into(),
                days_rented,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Finalizes a `Rental`: the `Game` is returned, and the delay fee (if
    /// any) is charged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the provided ID does not
    ///                         exist;
    /// - `RENTAL_ALREADY_FINALIZED` - the `Rental` with the provided ID is
    ///                                finalized already.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "finalizeRental",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn finalize_rental(
        id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::Rental, Error> {
        ctx.service()
            .execute(command::FinalizeRental {
                rental_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes a finalized `Rental` permanently, returning its ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the provided ID does not
    ///                         exist;
    /// - `RENTAL_NOT_FINALIZED` - the `Rental` with the provided ID is still
    ///                            active.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deleteRental",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_rental(
        id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::rental::Id, Error> {
        ctx.service()
            .execute(command::DeleteRental {
                rental_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rental| rental.id.into())
    }
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CPF_ALREADY_REGISTERED"]
                #[status = CONFLICT]
                #[message = "`Customer` with the provided CPF is already \
                             registered"]
                CpfAlreadyRegistered,
            }
        }

        match self {
            Self::CpfAlreadyRegistered(_) => {
                Some(Error::CpfAlreadyRegistered.into())
            }
            Self::Db(e) => {
                // A concurrent registration may slip past the uniqueness
                // check and hit the `customers_cpf_key` constraint instead.
                let database::Error::Postgres(e) = e;
                e.is_unique_violation(Some("customers_cpf_key"))
                    .then(|| Error::CpfAlreadyRegistered.into())
            }
        }
    }
}

impl AsError for command::create_game::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "GAME_NAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Game` with the provided name is already \
                             registered"]
                NameOccupied,
            }
        }

        match self {
            Self::Db(e) => {
                // Same story as with CPFs: rely on the `games_name_key`
                // constraint under concurrent additions.
                let database::Error::Postgres(e) = e;
                e.is_unique_violation(Some("games_name_key"))
                    .then(|| Error::NameOccupied.into())
            }
            Self::NameOccupied(_) => Some(Error::NameOccupied.into()),
        }
    }
}

impl AsError for command::create_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,

                #[code = "GAME_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Game` with the provided ID does not exist"]
                GameNotExists,

                #[code = "NO_STOCK_AVAILABLE"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "All copies of the `Game` are rented out"]
                NoStockAvailable,
            }
        }

        match self {
            Self::CustomerNotExists(_) => Some(Error::CustomerNotExists.into()),
            Self::Db(e) => e.try_as_error(),
            Self::GameNotExists(_) => Some(Error::GameNotExists.into()),
            Self::NoStockAvailable(_) => Some(Error::NoStockAvailable.into()),
        }
    }
}

impl AsError for command::finalize_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "GAME_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Game` of the `Rental` does not exist"]
                GameNotExists,

                #[code = "RENTAL_ALREADY_FINALIZED"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "`Rental` with the provided ID is finalized \
                             already"]
                RentalAlreadyFinalized,

                #[code = "RENTAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Rental` with the provided ID does not exist"]
                RentalNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::GameNotExists(_) => Some(Error::GameNotExists.into()),
            Self::RentalAlreadyFinalized(_) => {
                Some(Error::RentalAlreadyFinalized.into())
            }
            Self::RentalNotExists(_) => Some(Error::RentalNotExists.into()),
        }
    }
}

impl AsError for command::delete_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RENTAL_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Rental` with the provided ID does not exist"]
                RentalNotExists,

                #[code = "RENTAL_NOT_FINALIZED"]
                #[status = BAD_REQUEST]
                #[message = "`Rental` with the provided ID is still active"]
                RentalNotFinalized,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => Some(Error::RentalNotExists.into()),
            Self::RentalNotFinalized(_) => {
                Some(Error::RentalNotFinalized.into())
            }
        }
    }
}

define_error! {
    enum GameError {
        #[code = "INVALID_STOCK_TOTAL"]
        #[status = BAD_REQUEST]
        #[message = "`stockTotal` must be a positive integer"]
        InvalidStockTotal,
    }
}

define_error! {
    enum RentalError {
        #[code = "INVALID_DAYS_RENTED"]
        #[status = BAD_REQUEST]
        #[message = "`daysRented` must be a positive integer"]
        InvalidDaysRented,
    }
}
