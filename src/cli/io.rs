//! JSON I/O handling for CLI
//!
//! - Input: one JSON syntax tree via stdin
//! - Output: one JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use crate::ast::SyntaxTree;

use super::errors::{CliError, CliResult};

/// Read a syntax tree from stdin
pub fn read_query() -> CliResult<SyntaxTree> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_query(&input)
}

pub(crate) fn parse_query(input: &str) -> CliResult<SyntaxTree> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let query = parse_query(
            r#"{"kind": "select_query", "projection": [{"kind": "asterisk"}], "from": {"kind": "table_identifier", "database": null, "table": "events"}, "where_clause": null, "limit": null}"#,
        )
        .unwrap();
        assert_eq!(query.to_string(), "SELECT * FROM events");
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_query("  \n").unwrap_err();
        assert_eq!(err.code_str(), "AERO_CLI_IO_ERROR");
    }
}
