//! Coop Ledger Core
//!
//! Persistence and posting-discipline core for a cooperative back-office
//! system: the chart of accounts, the general-ledger grouping/definition
//! hierarchy, the journal voucher lifecycle with its debit=credit invariant,
//! and row-level account locking for concurrent balance-affecting operations.
//!
//! This crate is a library-level contract: HTTP/CLI handling, authentication,
//! and notification delivery live outside it. Callers supply a [`tenant::Actor`]
//! for every operation and receive structured [`errors::LedgerError`] values
//! on failure.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod services;
pub mod tenant;
