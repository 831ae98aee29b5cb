//! Pasar storefront library.
//!
//! The cart core (persisted cart, remote sync, the remove-after-remote-success
//! policy), the backend API client, and the axum proxy server. The server
//! binary and the `pasar` CLI are both thin shells over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
