//! objinv — read, write, inspect, and fuzzy-search Sphinx `objects.inv`
//! cross-reference inventories.

pub mod codec;
pub mod config;
pub mod data_object;
pub mod error;
pub mod fileops;
pub mod inventory;
pub mod line_parser;
pub mod schema;
pub mod suggest;

pub use config::CliConfig;
pub use data_object::{DataObjBytes, DataObjStr, LineMode};
pub use error::InventoryError;
pub use inventory::{Inventory, NamedSource, Source, SourceType};
pub use suggest::Suggestion;
