use serde_json::Value;

use crate::commands::Command;

/// Split an input line into its leading keyword and the remaining text.
fn split_keyword(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], input[i..].trim_start()),
        None => (input, ""),
    }
}

/// If `text` starts with `keyword` (case-insensitive) followed by whitespace
/// or the end of input, return what follows it.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let (word, rest) = split_keyword(text);
    word.eq_ignore_ascii_case(keyword).then_some(rest)
}

/// Parse the JSON value at the start of `input` and return it with the
/// unparsed remainder.
fn split_json_prefix(input: &str) -> Result<(Value, &str), String> {
    let mut stream = serde_json::Deserializer::from_str(input).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok((value, &input[stream.byte_offset()..])),
        Some(Err(e)) => Err(format!("Invalid JSON: {e}")),
        None => Err("Expected a JSON document".to_string()),
    }
}

/// `AND` as a standalone word at byte `i`.
fn is_and_separator(bytes: &[u8], i: usize) -> bool {
    i + 3 <= bytes.len()
        && bytes[i..i + 3].eq_ignore_ascii_case(b"and")
        && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        && (i + 3 == bytes.len() || bytes[i + 3].is_ascii_whitespace())
}

/// Split a chain of conditions on the `AND` keyword.
///
/// Text inside single or double quotes is never split. Returns an empty
/// vector for blank input.
fn split_conditions(text: &str) -> Result<Vec<String>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if is_and_separator(bytes, i) => {
                parts.push(text[start..i].trim());
                i += 3;
                start = i;
                continue;
            }
            None => {}
        }
        i += 1;
    }
    parts.push(text[start..].trim());

    if parts.iter().any(|p| p.is_empty()) {
        return Err("Empty condition next to AND".to_string());
    }
    Ok(parts.into_iter().map(str::to_string).collect())
}

fn required_conditions(text: &str, usage: &str) -> Result<Vec<String>, String> {
    let conditions = split_conditions(text)?;
    if conditions.is_empty() {
        return Err(usage.to_string());
    }
    Ok(conditions)
}

/// Parse an input line into a [`Command`].
pub fn parse(input: &str) -> Result<Command, String> {
    let (keyword, rest) = split_keyword(input);
    if keyword.is_empty() {
        return Err("Empty command".to_string());
    }

    match keyword.to_uppercase().as_str() {
        "INSERT" => parse_insert(rest),
        "ALL" => no_arguments(rest, "ALL", Command::All),
        "FIND" => Ok(Command::Find {
            conditions: required_conditions(rest, "Usage: FIND <condition> [AND <condition>]...")?,
        }),
        "FIRST" => Ok(Command::First {
            conditions: required_conditions(
                rest,
                "Usage: FIRST <condition> [AND <condition>]...",
            )?,
        }),
        "COUNT" => Ok(Command::Count {
            conditions: split_conditions(rest)?,
        }),
        "UPDATE" => parse_update(rest),
        "DELETE" => parse_delete(rest),
        "RELOAD" => no_arguments(rest, "RELOAD", Command::Reload),
        "CLEAR" => no_arguments(rest, "CLEAR", Command::Clear),
        "HELP" => {
            let topic = (!rest.is_empty()).then(|| rest.to_string());
            Ok(Command::Help(topic))
        }
        "EXIT" | "QUIT" => Ok(Command::Exit),
        _ => Err(format!("Unknown command '{keyword}'")),
    }
}

fn no_arguments(rest: &str, name: &str, cmd: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(cmd)
    } else {
        Err(format!("{name} takes no arguments"))
    }
}

/// INSERT <object | array of objects>
fn parse_insert(rest: &str) -> Result<Command, String> {
    if rest.is_empty() {
        return Err("Usage: INSERT <json object | json array>".to_string());
    }
    let (document, remainder) = split_json_prefix(rest)?;
    if !remainder.trim().is_empty() {
        return Err(format!("Unexpected input after JSON: '{}'", remainder.trim()));
    }

    let valid = match &document {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().all(Value::is_object),
        _ => false,
    };
    if !valid {
        return Err("INSERT expects a JSON object or an array of objects".to_string());
    }
    Ok(Command::Insert { document })
}

/// UPDATE <json patch> WHERE <condition> [AND <condition>]...
fn parse_update(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "Usage: UPDATE <json patch> WHERE <condition> [AND <condition>]...";
    if rest.is_empty() {
        return Err(USAGE.to_string());
    }

    let (patch, remainder) = split_json_prefix(rest)?;
    if !patch.is_object() {
        return Err("UPDATE patch must be a JSON object".to_string());
    }
    let conditions = strip_keyword(remainder, "WHERE").ok_or_else(|| USAGE.to_string())?;
    Ok(Command::Update {
        patch,
        conditions: required_conditions(conditions, USAGE)?,
    })
}

/// DELETE WHERE <condition> [AND <condition>]...
fn parse_delete(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "Usage: DELETE WHERE <condition> [AND <condition>]...  (use CLEAR to remove everything)";
    let conditions = strip_keyword(rest, "WHERE").ok_or_else(|| USAGE.to_string())?;
    Ok(Command::Delete {
        conditions: required_conditions(conditions, USAGE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // INSERT
    // -----------------------------------------------------------------------

    #[test]
    fn test_insert_object() {
        let cmd = parse(r#"INSERT {"name": "John", "age": 30}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Insert {
                document: json!({"name": "John", "age": 30})
            }
        );
    }

    #[test]
    fn test_insert_array() {
        let cmd = parse(r#"insert [{"a": 1}, {"b": {"c": "}"}}]"#).unwrap();
        assert_eq!(
            cmd,
            Command::Insert {
                document: json!([{"a": 1}, {"b": {"c": "}"}}])
            }
        );
    }

    #[test]
    fn test_insert_rejects_non_objects() {
        assert!(parse("INSERT 42").is_err());
        assert!(parse(r#"INSERT [1, {"a": 1}]"#).is_err());
        assert!(parse(r#"INSERT "text""#).is_err());
    }

    #[test]
    fn test_insert_bad_json() {
        let err = parse(r#"INSERT {"name": }"#).unwrap_err();
        assert!(err.starts_with("Invalid JSON"), "{err}");
        assert!(parse("INSERT").is_err());
    }

    #[test]
    fn test_insert_trailing_garbage() {
        let err = parse(r#"INSERT {"a": 1} extra"#).unwrap_err();
        assert!(err.contains("extra"), "{err}");
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn test_all() {
        assert_eq!(parse("ALL").unwrap(), Command::All);
        assert_eq!(parse("  all  ").unwrap(), Command::All);
        assert!(parse("ALL things").is_err());
    }

    #[test]
    fn test_find_single_condition() {
        assert_eq!(
            parse("FIND age >= 18").unwrap(),
            Command::Find {
                conditions: conds(&["age >= 18"])
            }
        );
    }

    #[test]
    fn test_find_chained_conditions() {
        assert_eq!(
            parse(r#"find age > 25 AND name contains "J" and profile.role = admin"#).unwrap(),
            Command::Find {
                conditions: conds(&["age > 25", r#"name contains "J""#, "profile.role = admin"])
            }
        );
    }

    #[test]
    fn test_and_inside_quotes_is_kept() {
        assert_eq!(
            parse(r#"FIND title = "Tom and Jerry" AND year > 1940"#).unwrap(),
            Command::Find {
                conditions: conds(&[r#"title = "Tom and Jerry""#, "year > 1940"])
            }
        );
    }

    #[test]
    fn test_and_inside_word_is_kept() {
        assert_eq!(
            parse("FIND brand = Sandisk").unwrap(),
            Command::Find {
                conditions: conds(&["brand = Sandisk"])
            }
        );
    }

    #[test]
    fn test_find_requires_condition() {
        assert!(parse("FIND").is_err());
        assert!(parse("FIRST   ").is_err());
    }

    #[test]
    fn test_dangling_and() {
        assert!(parse("FIND AND age > 3").is_err());
        assert!(parse("FIND a = 1 AND  AND b = 2").is_err());
    }

    #[test]
    fn test_first() {
        assert_eq!(
            parse("FIRST name startsWith Jo").unwrap(),
            Command::First {
                conditions: conds(&["name startsWith Jo"])
            }
        );
    }

    #[test]
    fn test_count_with_and_without_conditions() {
        assert_eq!(
            parse("COUNT").unwrap(),
            Command::Count { conditions: vec![] }
        );
        assert_eq!(
            parse("COUNT age < 18").unwrap(),
            Command::Count {
                conditions: conds(&["age < 18"])
            }
        );
    }

    // -----------------------------------------------------------------------
    // UPDATE / DELETE
    // -----------------------------------------------------------------------

    #[test]
    fn test_update() {
        assert_eq!(
            parse(r#"UPDATE {"profile.active": true} WHERE name = John AND age > 18"#).unwrap(),
            Command::Update {
                patch: json!({"profile.active": true}),
                conditions: conds(&["name = John", "age > 18"]),
            }
        );
    }

    #[test]
    fn test_update_lowercase_where() {
        assert_eq!(
            parse(r#"update {"x": 1} where a = 1"#).unwrap(),
            Command::Update {
                patch: json!({"x": 1}),
                conditions: conds(&["a = 1"]),
            }
        );
    }

    #[test]
    fn test_update_errors() {
        assert!(parse("UPDATE").is_err());
        assert!(parse(r#"UPDATE {"x": 1}"#).is_err());
        assert!(parse(r#"UPDATE {"x": 1} WHERE"#).is_err());
        assert!(parse(r#"UPDATE {"x": 1} a = 1"#).is_err());
        assert!(parse(r#"UPDATE [1] WHERE a = 1"#).is_err());
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            parse("DELETE WHERE age < 18").unwrap(),
            Command::Delete {
                conditions: conds(&["age < 18"])
            }
        );
    }

    #[test]
    fn test_delete_requires_where() {
        assert!(parse("DELETE").is_err());
        assert!(parse("DELETE age < 18").is_err());
        assert!(parse("DELETE WHERE").is_err());
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("RELOAD").unwrap(), Command::Reload);
        assert_eq!(parse("clear").unwrap(), Command::Clear);
        assert_eq!(parse("EXIT").unwrap(), Command::Exit);
        assert_eq!(parse("quit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse("HELP").unwrap(), Command::Help(None));
        assert_eq!(
            parse("help update").unwrap(),
            Command::Help(Some("update".to_string()))
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        let err = parse("SELECT * FROM users").unwrap_err();
        assert!(err.contains("SELECT"), "{err}");
    }
}
