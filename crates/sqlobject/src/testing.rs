//! Scripted executor for unit tests.

use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Response};
use crate::statement::Statement;
use crate::value::RowSet;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replies to statements from a queue, in order, and records every statement it saw.
pub(crate) struct ScriptedExecutor {
    schema: String,
    replies: Mutex<VecDeque<DbResult<Response>>>,
    seen: Mutex<Vec<Statement>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self {
            schema: "shop".to_string(),
            replies: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn rows(self, rows: RowSet) -> Self {
        self.reply(Ok(Response::with_rows(rows)))
    }

    pub(crate) fn affected(self, rows_affected: u64, last_insert_id: Option<u64>) -> Self {
        self.reply(Ok(Response::with_affected(rows_affected, last_insert_id)))
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.reply(Err(DbError::Other(message.to_string())))
    }

    pub(crate) fn reply(self, reply: DbResult<Response>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn statements(&self) -> Vec<Statement> {
        self.seen.lock().unwrap().clone()
    }

    /// Placeholder SQL of every statement run so far.
    pub(crate) fn sql(&self) -> Vec<String> {
        self.statements().iter().map(Statement::to_sql).collect()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    fn schema_name(&self) -> &str {
        &self.schema
    }

    async fn run(&self, statement: &Statement) -> DbResult<Response> {
        self.seen.lock().unwrap().push(statement.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DbError::Other(format!("no scripted reply for: {statement}"))))
    }
}
