pub mod connection;
pub mod schema;
pub mod scans;
pub mod store;
pub mod users;

pub use connection::Database;
pub use store::ScanStore;
