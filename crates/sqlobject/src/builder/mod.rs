//! Statement builders for single-table CRUD.
//!
//! All functions here are pure. Builders that may have nothing to write
//! (`build_insert`, `build_update`) return `None` instead of an empty
//! statement; check for it before executing.
//!
//! Each statement renders to `?`-placeholder SQL for execution and to an
//! inline text form with escaped, double-quoted literals:
//!
//! ```ignore
//! use sqlobject::{build_insert, row, TableSchema};
//!
//! let schema = TableSchema::from_types("widgets", [("guid", "char"), ("name", "varchar")]);
//! let stmt = build_insert("widgets", &row! { "guid" => "g1", "name" => "a" }, &schema, true).unwrap();
//! assert_eq!(stmt.to_sql(), "INSERT INTO widgets (`guid`,`name`) VALUES (?,?)");
//! assert_eq!(stmt.to_inline_sql(), r#"INSERT INTO widgets (`guid`,`name`) VALUES ("g1","a");"#);
//! ```
//!
//! Table and key names are written as given; validate them first (see
//! [`crate::Ident`]). [`crate::SqlObject`] does.

mod delete;
mod insert;
mod select;
mod update;


pub use delete::{build_delete, build_delete_by};
pub use insert::{INTERNAL_PREFIX, build_insert};
pub use select::{
    DATE_FORMAT, DEFAULT_PAGE_SIZE, Pagination, SelectOptions, build_pagination, build_select,
};
pub use update::build_update;

/// Column the legacy delete builder always filters on.
pub const DEFAULT_KEY: &str = "guid";
