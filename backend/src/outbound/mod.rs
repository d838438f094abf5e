//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: in-memory user aggregate store and dose log
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod persistence;
