//! Multi-step provider writes applied atomically.
//!
//! A batch is a list of `Operation`s run in one transaction. An insert can
//! take a column value from the row id produced by an earlier insert in the
//! same batch (a back reference), which is how a new raw contact and its
//! data rows are written together.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, warn};

use super::columns::{Column, MimeKind};
use crate::error::{ContactsError, ContactsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    RawContacts,
    Data,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::RawContacts => "raw_contacts",
            Table::Data => "data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
enum ValueSource {
    Literal(Value),
    BackReference(usize),
}

#[derive(Debug, Clone, PartialEq)]
struct Selection {
    clause: String,
    args: Vec<Value>,
}

/// One write against the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    kind: OpKind,
    table: Table,
    values: Vec<(Column, ValueSource)>,
    selection: Option<Selection>,
}

/// Outcome of one operation, in batch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchResult {
    Inserted(i64),
    Affected(usize),
}

impl BatchResult {
    pub fn inserted_id(self) -> Option<i64> {
        match self {
            BatchResult::Inserted(id) => Some(id),
            BatchResult::Affected(_) => None,
        }
    }
}

impl Operation {
    fn new(kind: OpKind, table: Table) -> Self {
        Self {
            kind,
            table,
            values: Vec::new(),
            selection: None,
        }
    }

    pub fn insert(table: Table) -> Self {
        Self::new(OpKind::Insert, table)
    }

    pub fn update(table: Table) -> Self {
        Self::new(OpKind::Update, table)
    }

    pub fn delete(table: Table) -> Self {
        Self::new(OpKind::Delete, table)
    }

    pub fn with_value(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.values.push((column, ValueSource::Literal(value.into())));
        self
    }

    pub fn with_mime(self, kind: MimeKind) -> Self {
        self.with_value(Column::Mimetype, kind.mime().to_string())
    }

    /// Take `column` from the row id inserted by operation `index`.
    pub fn with_back_reference(mut self, column: Column, index: usize) -> Self {
        self.values.push((column, ValueSource::BackReference(index)));
        self
    }

    /// Restrict an update or delete. `clause` uses `?` placeholders bound
    /// to `args` in order.
    pub fn with_selection(mut self, clause: impl Into<String>, args: Vec<Value>) -> Self {
        self.selection = Some(Selection {
            clause: clause.into(),
            args,
        });
        self
    }

    fn sql(&self) -> String {
        let table = self.table.name();
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.name()).collect();
        let where_clause = self
            .selection
            .as_ref()
            .map(|s| format!(" WHERE {}", s.clause))
            .unwrap_or_default();

        match self.kind {
            OpKind::Insert if columns.is_empty() => format!("INSERT INTO {} DEFAULT VALUES", table),
            OpKind::Insert => format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                vec!["?"; columns.len()].join(", ")
            ),
            OpKind::Update => format!(
                "UPDATE {} SET {}{}",
                table,
                columns
                    .iter()
                    .map(|c| format!("{} = ?", c))
                    .collect::<Vec<_>>()
                    .join(", "),
                where_clause
            ),
            OpKind::Delete => format!("DELETE FROM {}{}", table, where_clause),
        }
    }

    fn bind(&self, earlier: &[BatchResult]) -> ContactsResult<Vec<Value>> {
        let mut values = Vec::with_capacity(self.values.len());
        for (column, source) in &self.values {
            let value = match source {
                ValueSource::Literal(v) => v.clone(),
                ValueSource::BackReference(index) => earlier
                    .get(*index)
                    .and_then(|r| r.inserted_id())
                    .map(Value::Integer)
                    .ok_or_else(|| ContactsError::InvalidArgument {
                        name: column.name().into(),
                        reason: format!("back reference {} is not an earlier insert", index),
                    })?,
            };
            values.push(value);
        }
        if let Some(selection) = &self.selection {
            values.extend(selection.args.iter().cloned());
        }
        Ok(values)
    }

    fn apply(&self, conn: &Connection, earlier: &[BatchResult]) -> ContactsResult<BatchResult> {
        let params = self.bind(earlier)?;
        let changed = conn.execute(&self.sql(), params_from_iter(params.iter()))?;
        Ok(match self.kind {
            OpKind::Insert => BatchResult::Inserted(conn.last_insert_rowid()),
            OpKind::Update | OpKind::Delete => BatchResult::Affected(changed),
        })
    }
}

/// Apply every operation in one transaction. Any failure rolls the whole
/// batch back.
pub fn apply_batch(conn: &Connection, ops: &[Operation]) -> ContactsResult<Vec<BatchResult>> {
    let tx = conn.unchecked_transaction()?;
    let mut results = Vec::with_capacity(ops.len());

    for (index, op) in ops.iter().enumerate() {
        match op.apply(&tx, &results) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(index, table = op.table.name(), error = %e, "batch operation failed, rolling back");
                return Err(match e {
                    ContactsError::Database(source) => ContactsError::Batch { index, source },
                    other => other,
                });
            }
        }
    }

    tx.commit()?;
    debug!(operations = ops.len(), "batch applied");
    Ok(results)
}
