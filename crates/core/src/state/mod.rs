pub mod db;
pub mod documents;
pub mod io;

pub use db::StorefrontDb;
pub use documents::SqliteDocumentStore;
