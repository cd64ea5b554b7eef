pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod menu;
pub mod tools;

pub use catalog::{Catalog, QueryDefinition, Section};
pub use config::DbConfig;
pub use error::{MenuError, MenuResult};
pub use executor::Executor;
pub use menu::{LoopState, MenuLoop};
