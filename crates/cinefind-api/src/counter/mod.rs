//! Search counter service client module.
//!
//! Handles HTTP requests to the hosted counter service that tracks how
//! often each search term has been issued, keyed by term.

mod api;
mod client;
mod types;

pub use api::{LocalSearchCounterApi, SearchCounterApi};
pub use client::{CounterClient, CounterClientBuilder};
pub use types::{CounterListResponse, CounterRecord};
