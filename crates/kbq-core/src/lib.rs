//! # kbq-core
//!
//! Core types, ID generation, and error types for the knowledge-base query
//! service.
//!
//! This crate provides the foundational types shared across all crates:
//! - Entity structs for every domain object (project, FAQ, KB record,
//!   attachment, index version, build state, session, trace, tool).
//! - Deterministic identity minting and content fingerprinting.
//! - Cross-cutting error types.

pub mod entities;
pub mod errors;
pub mod identity;
