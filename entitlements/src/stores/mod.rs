//! Concrete storage backends for the provider traits.

pub mod postgres;
