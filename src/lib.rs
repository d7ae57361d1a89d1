pub mod analysis;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod population;
pub mod premium;
pub mod random;
pub mod simulation;
pub mod types;
pub mod year;
