//! In-memory [`Database`] double and fixtures for [`Command`] tests.
//!
//! [`Command`]: crate::Command

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Update,
    },
    Date, DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{customer, game, rental, Customer, Game, Rental},
    infra::{database, Database},
    read, Service,
};

/// In-memory [`Database`] keeping every record in process memory.
#[derive(Clone, Debug, Default)]
pub(crate) struct InMemory {
    /// Stored [`Customer`]s.
    customers: Arc<Mutex<HashMap<customer::Id, Customer>>>,

    /// Stored [`Game`]s.
    games: Arc<Mutex<HashMap<game::Id, Game>>>,

    /// Stored [`Rental`]s in insertion order.
    rentals: Arc<Mutex<Vec<Rental>>>,
}

/// Creates a new [`Service`] on top of an empty [`InMemory`] database.
pub(crate) fn service() -> Service<InMemory> {
    Service::new(InMemory::default())
}

pub(crate) fn customer_name(name: &str) -> customer::Name {
    customer::Name::new(name).unwrap()
}

pub(crate) fn phone(number: &str) -> customer::Phone {
    customer::Phone::new(number).unwrap()
}

pub(crate) fn cpf(cpf: &str) -> customer::Cpf {
    customer::Cpf::new(cpf).unwrap()
}

pub(crate) fn game_name(name: &str) -> game::Name {
    game::Name::new(name).unwrap()
}

pub(crate) fn image(url: &str) -> game::ImageUrl {
    game::ImageUrl::new(url).unwrap()
}

pub(crate) fn stock(total: i32) -> game::StockTotal {
    game::StockTotal::new(total).unwrap()
}

pub(crate) fn price(units: i64) -> game::PricePerDay {
    game::PricePerDay::new(Money::new(units).unwrap()).unwrap()
}

pub(crate) fn days(days: i32) -> rental::DaysRented {
    rental::DaysRented::new(days).unwrap()
}

/// Stores a new [`Customer`] with the provided CPF.
pub(crate) async fn given_customer(
    service: &Service<InMemory>,
    customer_cpf: &str,
) -> Customer {
    let customer = Customer {
        id: customer::Id::new(),
        name: customer_name("Ann"),
        phone: phone("11999999999"),
        cpf: cpf(customer_cpf),
        created_at: DateTime::now().coerce(),
    };
    let _: () = service
        .database()
        .execute(Insert(customer.clone()))
        .await
        .unwrap();
    customer
}

/// Stores a new [`Game`] with the provided name, stock and price per day.
pub(crate) async fn given_game(
    service: &Service<InMemory>,
    name: &str,
    stock_total: i32,
    price_per_day: i64,
) -> Game {
    let game = Game {
        id: game::Id::new(),
        name: game_name(name),
        image: image("https://example.com/box.png"),
        stock_total: stock(stock_total),
        price_per_day: price(price_per_day),
        created_at: DateTime::now().coerce(),
    };
    let _: () =
        service.database().execute(Insert(game.clone())).await.unwrap();
    game
}

/// Stores a new active [`Rental`] of the provided [`Game`], rented
/// `rent_offset_days` days relative to today.
pub(crate) async fn given_rental(
    service: &Service<InMemory>,
    customer: &Customer,
    game: &Game,
    rent_offset_days: i64,
    days_rented: i32,
) -> Rental {
    let rental = Rental {
        id: rental::Id::new(),
        customer_id: customer.id,
        game_id: game.id,
        rent_date: Date::today().plus_days(rent_offset_days).coerce(),
        days_rented: days(days_rented),
        original_price: Money::from(game.price_per_day)
            * i64::from(days_rented),
        return_date: None,
        delay_fee: Money::ZERO,
    };
    let _: () = service
        .database()
        .execute(Insert(rental.clone()))
        .await
        .unwrap();
    rental
}

/// Marks the provided [`Rental`] as returned today with no delay fee.
pub(crate) async fn given_returned(
    service: &Service<InMemory>,
    mut rental: Rental,
) {
    rental.return_date = Some(Date::today().coerce());
    let _: () =
        service.database().execute(Update(rental)).await.unwrap();
}

pub(crate) async fn customer_exists(
    service: &Service<InMemory>,
    id: customer::Id,
) -> bool {
    service
        .database()
        .execute(Select(By::<Option<Customer>, _>::new(id)))
        .await
        .unwrap()
        .is_some()
}

pub(crate) async fn game_exists(
    service: &Service<InMemory>,
    id: game::Id,
) -> bool {
    service
        .database()
        .execute(Select(By::<Option<Game>, _>::new(id)))
        .await
        .unwrap()
        .is_some()
}

pub(crate) async fn stored_rental(
    service: &Service<InMemory>,
    id: rental::Id,
) -> Rental {
    service
        .database()
        .execute(Select(By::<Option<Rental>, _>::new(id)))
        .await
        .unwrap()
        .unwrap()
}

pub(crate) async fn rental_count(service: &Service<InMemory>) -> usize {
    service.database().rentals.lock().unwrap().len()
}

impl Database<Select<By<Option<Customer>, customer::Id>>> for InMemory {
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.customers.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl<'c> Database<Select<By<Option<Customer>, &'c customer::Cpf>>>
    for InMemory
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, &'c customer::Cpf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let cpf = by.into_inner();
        Ok(self
            .customers
            .lock()
            .unwrap()
            .values()
            .find(|c| &c.cpf == cpf)
            .cloned())
    }
}

impl Database<Insert<Customer>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self
            .customers
            .lock()
            .unwrap()
            .insert(customer.id, customer);
        Ok(())
    }
}

impl Database<Select<By<Option<Game>, game::Id>>> for InMemory {
    type Ok = Option<Game>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Game>, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.games.lock().unwrap().get(&by.into_inner()).cloned())
    }
}

impl<'n> Database<Select<By<Option<Game>, &'n game::Name>>> for InMemory {
    type Ok = Option<Game>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Game>, &'n game::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();
        Ok(self
            .games
            .lock()
            .unwrap()
            .values()
            .find(|g| &g.name == name)
            .cloned())
    }
}

impl Database<Insert<Game>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(game): Insert<Game>,
    ) -> Result<Self::Ok, Self::Err> {
        let _ = self.games.lock().unwrap().insert(game.id, game);
        Ok(())
    }
}

impl Database<Lock<By<Game, game::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(_): Lock<By<Game, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Rental>, rental::Id>>> for InMemory {
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .rentals
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl Database<Select<By<read::rental::ActiveCount, game::Id>>> for InMemory {
    type Ok = read::rental::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::ActiveCount, game::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let game_id = by.into_inner();
        let count = self
            .rentals
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.game_id == game_id && r.is_active())
            .count();
        Ok(i64::try_from(count).unwrap().into())
    }
}

impl Database<Insert<Rental>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.rentals.lock().unwrap().push(rental);
        Ok(())
    }
}

impl Database<Update<Rental>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut rentals = self.rentals.lock().unwrap();
        if let Some(stored) = rentals.iter_mut().find(|r| r.id == rental.id) {
            *stored = rental;
        } else {
            rentals.push(rental);
        }
        Ok(())
    }
}

impl Database<Delete<Rental>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(rental): Delete<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.rentals.lock().unwrap().retain(|r| r.id != rental.id);
        Ok(())
    }
}

impl Database<Lock<By<Rental, rental::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(_): Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Transact> for InMemory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
