//! HTTP responses cached in a `cache` table.
//!
//! The table needs at least `ref`, `url` and `data` columns, with `ref` as
//! the lookup key.

use crate::builder::SelectOptions;
use crate::error::DbResult;
use crate::executor::Executor;
use crate::record::{ReadOutcome, RecordConfig, SqlObject};
use crate::row;
use crate::value::Row;

pub const CACHE_TABLE: &str = "cache";
pub const CACHE_KEY: &str = "ref";

/// Return the cached row for `reference`, fetching `url` and storing the body
/// on a miss.
///
/// Not atomic: concurrent misses for the same reference may both fetch.
pub async fn cache_fetch<E: Executor>(
    executor: E,
    http: &reqwest::Client,
    reference: &str,
    url: &str,
) -> DbResult<Option<Row>> {
    let mut entry = SqlObject::new(
        executor,
        RecordConfig::new(CACHE_TABLE).key(CACHE_KEY).id(reference),
    )?;

    if let ReadOutcome::Found(rows) = entry.read(SelectOptions::new()).await? {
        tracing::debug!(target: "sqlobject.record", reference, "cache hit");
        return Ok(rows.into_iter().next());
    }

    tracing::info!(target: "sqlobject.record", reference, url, "cache miss, fetching");
    let body = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    entry
        .create(row! { CACHE_KEY => reference, "url" => url, "data" => body }, true)
        .await?;
    Ok(entry.state().datum().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;
    use crate::value::Value;

    #[tokio::test]
    async fn hit_is_served_from_the_table() {
        let db = ScriptedExecutor::new()
            .rows(vec![
                row! { "column_name" => "ref", "data_type" => "varchar", "column_type" => "varchar(64)", "extra" => "" },
                row! { "column_name" => "url", "data_type" => "text", "column_type" => "text", "extra" => "" },
                row! { "column_name" => "data", "data_type" => "longtext", "column_type" => "longtext", "extra" => "" },
            ])
            .rows(vec![row! { "ref" => "r1", "url" => "http://x", "data" => "cached" }]);

        let hit = cache_fetch(&db, &reqwest::Client::new(), "r1", "http://x")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.get("data"), Some(&Value::from("cached")));
        assert_eq!(db.sql()[1], "SELECT * FROM cache WHERE `ref` = ?");
    }
}
