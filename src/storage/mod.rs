pub mod sqlite;
pub mod store;

#[cfg(test)]
pub mod fixtures;

pub use sqlite::SqliteStore;
pub use store::SearchStore;
