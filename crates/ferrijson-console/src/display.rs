use serde_json::{Value, json};

use crate::executor::CommandResult;

/// Output mode for rendering command results.
pub enum OutputMode {
    /// Human-readable pretty-printed output.
    Pretty,
    /// Machine-parseable JSON (one JSON object per result on stdout).
    Json,
}

/// Render a command result to stdout in the given mode.
///
/// Returns `true` to continue execution, `false` to signal exit.
pub fn render(result: &CommandResult, mode: &OutputMode) -> bool {
    match result {
        CommandResult::Ok(msg) => match mode {
            OutputMode::Pretty => print_ok(msg),
            OutputMode::Json => println!("{}", json!({"ok": true, "message": msg})),
        },
        CommandResult::Item(item) => match mode {
            OutputMode::Pretty => match item {
                Some(v) => print_item(v),
                None => print_not_found(),
            },
            OutputMode::Json => match item {
                Some(v) => println!("{}", json!({"found": true, "item": v})),
                None => println!("{}", json!({"found": false})),
            },
        },
        CommandResult::Items(items) => match mode {
            OutputMode::Pretty => print_items(items),
            OutputMode::Json => {
                println!("{}", json!({"items": items, "count": items.len()}));
            }
        },
        CommandResult::Count(n) => match mode {
            OutputMode::Pretty => println!("{n}"),
            OutputMode::Json => println!("{}", json!({"count": n})),
        },
        CommandResult::Help(topic) => match mode {
            OutputMode::Pretty => render_help_pretty(topic.as_deref()),
            OutputMode::Json => render_help_json(topic.as_deref()),
        },
        CommandResult::Exit => return false,
    }
    true
}

/// Render an error in the given mode (always to stderr).
pub fn render_error(err: &dyn std::fmt::Display, mode: &OutputMode) {
    match mode {
        OutputMode::Pretty => print_error(err),
        OutputMode::Json => {
            eprintln!("{}", json!({"error": err.to_string()}));
        }
    }
}

// ---- Pretty-print helpers ----

/// Pretty-print a single record with 2-space indentation.
pub fn print_item(item: &Value) {
    match serde_json::to_string_pretty(item) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error formatting record: {e}"),
    }
}

pub fn print_not_found() {
    println!("No matching record.");
}

pub fn print_items(items: &[Value]) {
    for item in items {
        print_item(item);
    }
    println!("Returned {} record(s).", items.len());
}

pub fn print_ok(msg: &str) {
    println!("{msg}");
}

/// Print an error message to stderr.
pub fn print_error(err: &dyn std::fmt::Display) {
    eprintln!("Error: {err}");
}

// ---------------------------------------------------------------------------
// Structured per-command help
// ---------------------------------------------------------------------------

struct CommandHelp {
    name: &'static str,
    summary: &'static str,
    syntax: &'static str,
    details: &'static str,
    examples: &'static [&'static str],
}

const CONDITION_DETAILS: &str = "\
A condition is `field operator value`. Fields may be dot paths into nested \
objects (profile.settings.theme). Operators: = != > < >= <= contains \
startsWith endsWith.

Values true, false, null and undefined are keywords; numeric text is a \
number; anything else is a string. One layer of quotes is removed, so \
\"18\" is still the number 18.

Chain conditions with AND. AND inside quotes is not a separator. A \
condition without an operator is ignored.";

const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "INSERT",
        summary: "Append a record, or every record of an array",
        syntax: "INSERT <json object | json array of objects>",
        details: "The whole file is rewritten after the insert.",
        examples: &[
            r#"INSERT {"name": "John", "age": 30}"#,
            r#"INSERT [{"name": "Jane"}, {"name": "Bob", "profile": {"role": "admin"}}]"#,
        ],
    },
    CommandHelp {
        name: "ALL",
        summary: "Show every record",
        syntax: "ALL",
        details: "",
        examples: &["ALL"],
    },
    CommandHelp {
        name: "FIND",
        summary: "Show records matching a chain of conditions",
        syntax: "FIND <condition> [AND <condition>]...",
        details: CONDITION_DETAILS,
        examples: &[
            "FIND age >= 18",
            r#"FIND age > 25 AND name contains "J""#,
            "FIND profile.role = admin",
        ],
    },
    CommandHelp {
        name: "FIRST",
        summary: "Show the first record matching a chain of conditions",
        syntax: "FIRST <condition> [AND <condition>]...",
        details: CONDITION_DETAILS,
        examples: &["FIRST name startsWith Jo"],
    },
    CommandHelp {
        name: "COUNT",
        summary: "Count records, optionally filtered",
        syntax: "COUNT [<condition> [AND <condition>]...]",
        details: CONDITION_DETAILS,
        examples: &["COUNT", "COUNT deleted = undefined"],
    },
    CommandHelp {
        name: "UPDATE",
        summary: "Patch every record matching a chain of conditions",
        syntax: "UPDATE <json patch> WHERE <condition> [AND <condition>]...",
        details: "\
Each key of the patch replaces that attribute. Keys containing a dot set \
a nested attribute, creating (or replacing non-object) intermediate \
objects along the way.",
        examples: &[
            r#"UPDATE {"active": false} WHERE last_login < 1700000000"#,
            r#"UPDATE {"profile.active": true} WHERE name = John"#,
        ],
    },
    CommandHelp {
        name: "DELETE",
        summary: "Remove every record matching a chain of conditions",
        syntax: "DELETE WHERE <condition> [AND <condition>]...",
        details: "Relative order of the remaining records is preserved. Use CLEAR to remove everything.",
        examples: &[
            "DELETE WHERE age < 18",
            "DELETE WHERE status = archived AND year < 2020",
        ],
    },
    CommandHelp {
        name: "RELOAD",
        summary: "Discard in-memory records and read the file again",
        syntax: "RELOAD",
        details: "A missing or unreadable file reloads as an empty store.",
        examples: &["RELOAD"],
    },
    CommandHelp {
        name: "CLEAR",
        summary: "Remove every record",
        syntax: "CLEAR",
        details: "Writes an empty array to the file.",
        examples: &["CLEAR"],
    },
    CommandHelp {
        name: "HELP",
        summary: "Show help for all commands or one command",
        syntax: "HELP [command]",
        details: "",
        examples: &["HELP", "HELP update"],
    },
    CommandHelp {
        name: "EXIT / QUIT",
        summary: "Exit the console",
        syntax: "EXIT  (or QUIT)",
        details: "Closes the FerriJSON console session.",
        examples: &["EXIT", "QUIT"],
    },
];

/// Lookup key(s) that match this command (lowercase).
fn topic_keys(cmd: &CommandHelp) -> Vec<&'static str> {
    match cmd.name {
        "EXIT / QUIT" => vec!["exit", "quit"],
        name => vec![name],
    }
}

fn find_command(topic: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|cmd| {
        topic_keys(cmd)
            .iter()
            .any(|k| k.eq_ignore_ascii_case(topic.trim()))
    })
}

fn render_help_pretty(topic: Option<&str>) {
    match topic {
        None => print_help_overview(),
        Some(t) => match find_command(t) {
            Some(cmd) => print_command_help(cmd),
            None => {
                println!("Unknown help topic '{t}'. Type HELP to see available commands.");
            }
        },
    }
}

fn print_help_overview() {
    println!("FerriJSON Console - Command Reference");
    println!();
    for cmd in COMMANDS {
        println!("  {:<12} {}", cmd.name, cmd.summary);
    }
    println!();
    println!("Type HELP <command> for syntax and examples.");
}

fn print_command_help(cmd: &CommandHelp) {
    println!("{} - {}", cmd.name, cmd.summary);
    println!();
    println!("Syntax:");
    println!("  {}", cmd.syntax);
    if !cmd.details.is_empty() {
        println!();
        for line in cmd.details.lines() {
            if line.is_empty() {
                println!();
            } else {
                println!("{line}");
            }
        }
    }
    if !cmd.examples.is_empty() {
        println!();
        println!("Examples:");
        for ex in cmd.examples {
            println!("  {ex}");
        }
    }
}

fn render_help_json(topic: Option<&str>) {
    match topic {
        None => {
            let commands: Vec<Value> = COMMANDS
                .iter()
                .map(|cmd| {
                    json!({
                        "name": cmd.name,
                        "summary": cmd.summary,
                    })
                })
                .collect();
            println!("{}", json!({ "commands": commands }));
        }
        Some(t) => match find_command(t) {
            Some(cmd) => {
                println!(
                    "{}",
                    json!({
                        "command": cmd.name,
                        "summary": cmd.summary,
                        "syntax": cmd.syntax,
                        "details": cmd.details,
                        "examples": cmd.examples,
                    })
                );
            }
            None => {
                eprintln!("{}", json!({"error": format!("Unknown help topic '{t}'")}));
            }
        },
    }
}
