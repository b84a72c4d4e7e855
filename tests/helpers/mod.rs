// Shared fixtures for the database-backed integration tests.
//
// Each test gets its own freshly migrated database on the server named by
// TEST_DATABASE_URL (a server URL without a database name), dropped at the end.

#![allow(dead_code)]

pub mod test_data;

pub use test_data::*;
pub use test_database::*;
