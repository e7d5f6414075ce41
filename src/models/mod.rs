//! Core data models for the upload gateway.
//!
//! The service keeps no durable state of its own; the only entity it hands
//! around is the view of a blob that lives in the external container.

pub mod blob;
