//! PokeSearch - paged Pokemon species search over the PokeAPI GraphQL endpoint
//!
//! The library holds the query client, the search and detail sessions, and
//! the tui-dispatch state/reducer/components so they can be tested without a
//! terminal.

pub mod action;
pub mod color;
pub mod components;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod query;
pub mod reducer;
pub mod session;
pub mod state;
pub mod transport;
