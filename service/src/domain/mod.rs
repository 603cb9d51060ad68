//! Domain definitions.

pub mod customer;
pub mod game;
pub mod rental;

pub use self::{customer::Customer, game::Game, rental::Rental};
