//! Read-only data sources served by the provider

pub mod coffees;
pub mod order;

pub use coffees::CoffeesDataSource;
pub use order::OrderDataSource;
