//! # sqlobject
//!
//! A small active-record layer over MySQL.
//!
//! ## Features
//!
//! - **Schema introspection**: columns, types, enums, foreign keys and table
//!   kind from `INFORMATION_SCHEMA`
//! - **Statement builders**: pure functions for INSERT / SELECT / UPDATE /
//!   DELETE that return `None` when there is nothing to do
//! - **Bound parameters**: values travel as `?` placeholders; an escaped
//!   inline rendering is kept for logs and the last-operation record
//! - **Record object**: [`SqlObject`] loads the table schema once and exposes
//!   create / read / update / destroy / read_or_create over an explicit state
//! - **One pool per process**: [`MySqlExecutor`] wraps a shared `sqlx` pool
//!
//! ## Example
//!
//! ```ignore
//! use sqlobject::{DbConfig, MySqlExecutor, RecordConfig, SqlObject, row};
//!
//! let db = MySqlExecutor::connect(&DbConfig::from_dotenv()?).await?;
//!
//! let mut widget = SqlObject::new(&db, RecordConfig::new("widgets"))?;
//! widget.create(row! { "guid" => "w-1", "name" => "a" }, true).await?;
//! widget.update(row! { "name" => "b" }).await?;
//! widget.destroy().await?;
//!
//! db.close().await;
//! ```
//!
//! ## Cargo features
//!
//! - `http`: [`cache_fetch`], an HTTP GET cached in a `cache` table.

pub mod builder;
pub mod config;
pub mod error;
pub mod escape;
pub mod executor;
pub mod ident;
pub mod pool;
pub mod record;
pub mod schema;
pub mod statement;
pub mod value;

#[cfg(feature = "http")]
pub mod cache;

#[cfg(test)]
mod testing;

pub use builder::{
    DATE_FORMAT, DEFAULT_KEY, DEFAULT_PAGE_SIZE, INTERNAL_PREFIX, Pagination, SelectOptions,
    build_delete, build_delete_by, build_insert, build_pagination, build_select, build_update,
};
pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use escape::escape_value;
pub use executor::{
    DEFAULT_RETRIES, Executor, MySqlExecutor, Response, execute, execute_with_retry,
    run_with_retry,
};
pub use ident::Ident;
pub use pool::{create_pool, create_pool_lazy};
pub use record::{
    LastOperation, ReadOutcome, RecordConfig, RecordState, SqlObject, WriteOutcome,
};
pub use schema::{ColumnDef, ForeignKey, TableDescription, TableSchema};
pub use statement::{Statement, StatementKind};
pub use value::{Row, RowSet, Value};

#[cfg(feature = "http")]
pub use cache::cache_fetch;
