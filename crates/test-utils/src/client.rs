//! Recording SQL client with failure injection.
//!
//! [`RecordingClient`] stands in for a database in unit tests. It records
//! every statement it receives and answers from a list of scripted rules.
//!
//! # Features
//!
//! - **Statement log**: inspect what a store actually sent
//! - **Scripted answers**: rows for `first`, change counts for `run`
//! - **Failure injection**: fail once or on every matching statement
//!
//! Rules match on statement prefix (after trimming leading whitespace) and
//! are consulted in insertion order. A rule with a use limit is skipped once
//! exhausted. Without a matching rule `first` returns no row and `run`
//! reports zero changes.

use async_trait::async_trait;
use handles_store::{Row, SqlClient, SqlValue, StorageError};
use parking_lot::Mutex;

/// A statement received by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStatement {
    /// Statement text as sent.
    pub sql: String,
    /// Bound parameters.
    pub params: Vec<SqlValue>,
}

#[derive(Debug, Clone)]
enum Answer {
    Fail(String),
    Changes(u64),
    Row(Row),
}

#[derive(Debug)]
struct Rule {
    prefix: String,
    answer: Answer,
    remaining: Option<usize>,
}

/// In-memory [`SqlClient`] mock.
#[derive(Debug, Default)]
pub struct RecordingClient {
    statements: Mutex<Vec<RecordedStatement>>,
    rules: Mutex<Vec<Rule>>,
}

impl RecordingClient {
    /// Creates a client with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_rule(&self, prefix: &str, answer: Answer, remaining: Option<usize>) {
        self.rules.lock().push(Rule { prefix: prefix.to_string(), answer, remaining });
    }

    /// Fails the next statement starting with `prefix` with `message`.
    pub fn fail_once(&self, prefix: &str, message: &str) {
        self.add_rule(prefix, Answer::Fail(message.to_string()), Some(1));
    }

    /// Fails every statement starting with `prefix` with `message`.
    pub fn fail_always(&self, prefix: &str, message: &str) {
        self.add_rule(prefix, Answer::Fail(message.to_string()), None);
    }

    /// Reports `changes` for every `run` of a statement starting with `prefix`.
    pub fn respond_changes(&self, prefix: &str, changes: u64) {
        self.add_rule(prefix, Answer::Changes(changes), None);
    }

    /// Returns `row` for every `first` of a statement starting with `prefix`.
    pub fn respond_row(&self, prefix: &str, row: Row) {
        self.add_rule(prefix, Answer::Row(row), None);
    }

    /// Every statement received so far, in order.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.statements.lock().clone()
    }

    /// Number of received statements starting with `prefix`.
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.statements.lock().iter().filter(|s| s.sql.trim_start().starts_with(prefix)).count()
    }

    fn answer(&self, sql: &str, params: Vec<SqlValue>) -> Option<Answer> {
        self.statements.lock().push(RecordedStatement { sql: sql.to_string(), params });
        let mut rules = self.rules.lock();
        let rule = rules.iter_mut().find(|rule| {
            rule.remaining != Some(0) && sql.trim_start().starts_with(&rule.prefix)
        })?;
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(rule.answer.clone())
    }
}

#[async_trait]
impl SqlClient for RecordingClient {
    async fn first(&self, sql: &str, params: Vec<SqlValue>) -> handles_store::Result<Option<Row>> {
        match self.answer(sql, params) {
            Some(Answer::Fail(message)) => Err(StorageError::Query { message }),
            Some(Answer::Row(row)) => Ok(Some(row)),
            Some(Answer::Changes(_)) | None => Ok(None),
        }
    }

    async fn run(&self, sql: &str, params: Vec<SqlValue>) -> handles_store::Result<u64> {
        match self.answer(sql, params) {
            Some(Answer::Fail(message)) => Err(StorageError::Query { message }),
            Some(Answer::Changes(changes)) => Ok(changes),
            Some(Answer::Row(_)) | None => Ok(0),
        }
    }
}
