//! Vehicle marketplace service.
//!
//! [`Marketplace`] ties the entity model to the store. It validates input at
//! the boundary, probes users for the capability an operation needs, and
//! answers permission failures with a [`Decision::Denied`] rather than an
//! error.
//!
//! # Example
//!
//! ```no_run
//! use catalog::{Marketplace, NewVehicle, Registration};
//! use catalog_core::Role;
//! use catalog_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:catalogo_veiculos.db?mode=rwc").await?;
//!     db.migrate().await?;
//!     let market = Marketplace::new(db);
//!
//!     let seller = market
//!         .register(
//!             Registration::new(Role::Advertiser, "12345678900", "João", "joao@email.com", "senha123")
//!                 .with_phone("119999"),
//!         )
//!         .await?;
//!
//!     let car = NewVehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(seller.id());
//!     if let Some(vehicle) = market.create_vehicle(car).await?.allowed() {
//!         market.create_advertisement(seller.id(), vehicle.id).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod decision;
pub mod error;
pub mod marketplace;
pub mod validation;

pub use decision::{Decision, Denial};
pub use error::{MarketplaceError, Result};
pub use marketplace::{Marketplace, NewVehicle, Registration};
