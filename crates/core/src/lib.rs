//! Core types and contracts for eventplanner.
//!
//! Everything in this crate is pure: entity types, validation, key encoding for
//! the single-table layout, error taxonomy and the traits that storage backends,
//! services and notification collaborators implement. No I/O happens here.

pub mod event;
pub mod notification;
pub mod service;
pub mod storage;
