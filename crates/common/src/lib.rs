//! Cross-crate utilities shared by the catalog binaries and server crate.

pub mod utils;
