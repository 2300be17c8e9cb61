pub mod config;
pub mod daterange;
pub mod error;
pub mod io;
pub mod policy;
pub mod random;
pub mod shop;
pub mod simulator;
pub mod sink;
pub mod store;
pub mod types;

pub use error::{Result, ShopGenError};
