//! Victim records and the automatic death sweep.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/victims` | Create a victim with optional evidence images |
//! | GET | `/api/victims` | List victims (`limit`, `offset`, `isAlive`) |
//! | DELETE | `/api/victims` | Delete every victim |
//! | GET | `/api/victims/{id}` | Get a victim |
//! | DELETE | `/api/victims/{id}` | Delete a victim and its images |
//! | PATCH | `/api/victims/{id}/death-type` | Change the cause of death |
//! | PATCH | `/api/victims/{id}/details` | Change the death details |
//! | POST | `/api/victims/{id}/images` | Attach evidence images |
//!
//! `DeathSweeper` runs in the background and marks living victims dead once
//! the rule for their cause of death fires.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod workers;

pub use services::{DeathRuleTable, VictimService};
pub use store::{InMemoryVictimStore, PgVictimStore, VictimStore};
pub use workers::DeathSweeper;
