//! Event planning services over a single-table store.
//!
//! The pure domain (entities, validation, key layout and traits) lives in
//! `eventplanner_core`. This crate provides the store backends, the service
//! implementations and the notification plumbing.

pub mod config;
pub mod notifications;
pub mod services;
pub mod state;
pub mod storage;
