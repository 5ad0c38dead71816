use ferrijson_core::api::{QueryBuilder, Store};
use ferrijson_core::error::Error;
use serde_json::Value;

use crate::commands::Command;

/// Structured result from executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Mutation succeeded (INSERT, UPDATE, DELETE, RELOAD, CLEAR).
    Ok(String),
    /// Single record returned (FIRST).
    Item(Option<Value>),
    /// Multiple records returned (ALL, FIND).
    Items(Vec<Value>),
    /// Number of matching records (COUNT).
    Count(usize),
    /// Help text (optional topic for per-command help).
    Help(Option<String>),
    /// Exit signal.
    Exit,
}

/// Execute a parsed command against the store.
pub fn execute(store: &mut Store, cmd: Command) -> Result<CommandResult, Error> {
    match cmd {
        Command::Insert { document } => exec_insert(store, document),
        Command::All => Ok(CommandResult::Items(store.get().to_vec())),
        Command::Find { conditions } => {
            let q = chain(store, &conditions);
            let items = q.get().into_iter().cloned().collect();
            Ok(CommandResult::Items(items))
        }
        Command::First { conditions } => {
            let q = chain(store, &conditions);
            let item = q.first().cloned();
            Ok(CommandResult::Item(item))
        }
        Command::Count { conditions } => {
            Ok(CommandResult::Count(chain(store, &conditions).count()))
        }
        Command::Update { patch, conditions } => {
            let n = chain(store, &conditions).update(&patch)?;
            Ok(CommandResult::Ok(format!("Updated {n} record(s).")))
        }
        Command::Delete { conditions } => {
            let n = chain(store, &conditions).delete()?;
            Ok(CommandResult::Ok(format!("Deleted {n} record(s).")))
        }
        Command::Reload => {
            store.reload();
            Ok(CommandResult::Ok(format!("Reloaded {} record(s).", store.len())))
        }
        Command::Clear => {
            store.clear()?;
            Ok(CommandResult::Ok("Cleared all records.".to_string()))
        }
        Command::Help(topic) => Ok(CommandResult::Help(topic)),
        Command::Exit => Ok(CommandResult::Exit),
    }
}

/// Build a query applying `conditions` in order.
fn chain<'s>(store: &'s mut Store, conditions: &[String]) -> QueryBuilder<'s, Store> {
    conditions
        .iter()
        .fold(store.query(), |q, condition| q.filter(condition))
}

fn exec_insert(store: &mut Store, document: Value) -> Result<CommandResult, Error> {
    match document {
        Value::Array(records) => {
            let n = records.len();
            store.insert_many(records)?;
            Ok(CommandResult::Ok(format!("Inserted {n} record(s).")))
        }
        record => {
            store.insert(record)?;
            Ok(CommandResult::Ok("Inserted 1 record(s).".to_string()))
        }
    }
}
