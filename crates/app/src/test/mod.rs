//! Shared test infrastructure: one PostgreSQL container, one database per test.

mod context;
pub(crate) mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
