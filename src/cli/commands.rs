pub mod initdb;
pub mod populate_db;
pub mod serve;

pub use initdb::init_database;
pub use populate_db::populate_db;
pub use serve::serve;
