//! Entity model for the vehicle catalog.
//!
//! This crate defines the in-memory entities and their behavior:
//!
//! - [`User`] - a registered user wrapping one role record ([`Admin`],
//!   [`Advertiser`] or [`Client`]) around a shared [`Account`]
//! - [`Approver`], [`UserManager`], [`AdCreator`], [`Searcher`] - the
//!   capabilities a role may carry, probed through `User::as_*`
//! - [`Vehicle`] and [`Advertisement`] - listings and the
//!   Pending → Approved / Rejected lifecycle
//!
//! Nothing here touches storage. Entities are rebuilt from the store on every
//! read and compared by id, never by reference.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::{Account, Admin, Advertiser, User, Vehicle};
//!
//! let mut seller: User = Advertiser::new(
//!     Account::new(2, "12345678900", "João", "joao@email.com", "senha123"),
//!     "119999",
//! )
//! .into();
//! let admin: User = Admin::new(
//!     Account::new(1, "00000000000", "Administrador", "admin@admin.com", "admin123"),
//!     1,
//! )
//! .into();
//!
//! let vehicle = Vehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(2);
//! let mut ad = seller.as_ad_creator_mut().unwrap().create_ad(vehicle);
//! admin.as_approver().unwrap().approve_ad(&mut ad).unwrap();
//! assert_eq!(ad.status().as_str(), "Aprovado");
//! ```

pub mod account;
pub mod admin;
pub mod advertisement;
pub mod advertiser;
pub mod capability;
pub mod client;
pub mod error;
pub mod role;
pub mod user;
pub mod vehicle;

pub use account::{validate_email, validate_password, Account, MIN_PASSWORD_LEN};
pub use admin::Admin;
pub use advertisement::{today, AdStatus, Advertisement, PUBLICATION_DATE_FORMAT};
pub use advertiser::Advertiser;
pub use capability::{AdCreator, Approver, Searcher, UserAction, UserManager};
pub use client::Client;
pub use error::{CatalogError, Result, ValidationError};
pub use role::Role;
pub use user::User;
pub use vehicle::Vehicle;
