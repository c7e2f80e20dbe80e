pub mod connection;
pub mod migrations;
pub mod models;
pub mod pekerjaan_repository;

#[cfg(test)]
pub mod memory;

pub use pekerjaan_repository::{PekerjaanStore, PgPekerjaanRepository};
