use serde_json::Value;

/// A parsed console command.
///
/// `conditions` hold raw condition strings, applied in order as a chain.
#[derive(Debug, PartialEq)]
pub enum Command {
    Insert {
        document: Value,
    },
    All,
    Find {
        conditions: Vec<String>,
    },
    First {
        conditions: Vec<String>,
    },
    Count {
        conditions: Vec<String>,
    },
    Update {
        patch: Value,
        conditions: Vec<String>,
    },
    Delete {
        conditions: Vec<String>,
    },
    Reload,
    Clear,
    Help(Option<String>),
    Exit,
}
