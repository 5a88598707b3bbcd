//! Deadman's Wallet service
//!
//! Lets a user connect a wallet, lock tokens with a designated heir and
//! an inactivity limit, prove activity with heartbeats, and have the
//! locked tokens transferred to the heir once the limit elapses without
//! one. Ledger interaction is served by a backend that is either fully
//! simulated or chain-backed for balance reads.

pub mod api;
pub mod config;
pub mod error;
pub mod faucet;
pub mod ledger;
pub mod manager;
pub mod provider;
pub mod session;
pub mod storage;
pub mod switch;
