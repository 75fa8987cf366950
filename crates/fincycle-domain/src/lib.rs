//! fincycle-domain
//!
//! Pure domain models (Transaction, SavingGoal, SpecialDate, Settings, etc.).
//! No I/O, no storage. Only data types, validation and calendar helpers.

pub mod category;
pub mod common;
pub mod error;
pub mod forecast;
pub mod goal;
pub mod period;
pub mod settings;
pub mod special_date;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use error::SettingsError;
pub use forecast::*;
pub use goal::*;
pub use period::*;
pub use settings::*;
pub use special_date::*;
pub use transaction::*;
