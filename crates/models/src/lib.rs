//! SeaORM entities and connection helpers for the identity store.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_file;

#[cfg(test)]
mod tests;
