//! Storage: key encoding, the partition store contract, the in-memory host,
//! and typed document repositories on top of them.

pub mod host;
pub mod key;
pub mod repo;
pub mod store;
