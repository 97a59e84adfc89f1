pub mod sqlite;

pub use sqlite::SeenStore;
