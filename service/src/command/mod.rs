//! [`Command`] definition.

pub mod create_customer;
pub mod create_game;
pub mod create_rental;
pub mod delete_rental;
pub mod finalize_rental;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_customer::CreateCustomer, create_game::CreateGame,
    create_rental::CreateRental, delete_rental::DeleteRental,
    finalize_rental::FinalizeRental,
};

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::testing;

    use super::{
        Command as _, CreateCustomer, CreateGame, CreateRental, DeleteRental,
        FinalizeRental,
    };

    #[tokio::test]
    async fn whole_rental_lifecycle() {
        let service = testing::service();

        let customer = service
            .execute(CreateCustomer {
                name: testing::customer_name("Ann"),
                phone: testing::phone("11999999999"),
                cpf: testing::cpf("12345678901"),
            })
            .await
            .unwrap();

        let game = service
            .execute(CreateGame {
                name: testing::game_name("Chess"),
                image: testing::image("https://example.com/chess.png"),
                stock_total: testing::stock(1),
                price_per_day: testing::price(1000),
            })
            .await
            .unwrap();

        let rental = service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(2),
            })
            .await
            .unwrap();
        assert_eq!(rental.original_price, Money::new(2000).unwrap());
        assert!(rental.return_date.is_none());
        assert_eq!(rental.delay_fee, Money::ZERO);

        // The single copy is rented out now.
        assert!(service
            .execute(CreateRental {
                customer_id: customer.id,
                game_id: game.id,
                days_rented: testing::days(2),
            })
            .await
            .is_err());

        let finalized = service
            .execute(FinalizeRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();
        assert_eq!(finalized.delay_fee, Money::ZERO);

        let _ = service
            .execute(DeleteRental {
                rental_id: rental.id,
            })
            .await
            .unwrap();
        assert_eq!(testing::rental_count(&service).await, 0);
    }
}
