//! Managed resources served by the provider

pub mod order;

pub use order::OrderResource;
