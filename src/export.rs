//! CSV export of list pages

use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

/// Render `rows` as CSV with one column per header, in header order.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn to_csv(rows: &[Value], headers: &[&str]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| escape(header))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = headers
            .iter()
            .map(|header| escape(&field(row.get(*header))).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Write [`to_csv`] output to `path`
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[Value], headers: &[&str]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_csv(rows, headers))
        .map_err(|e| Error::storage(format!("failed to write {}: {}", path.display(), e)))
}

fn field(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

fn escape(raw: &str) -> Cow<'_, str> {
    if raw.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        Cow::Owned(format!("\"{}\"", raw.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quotes_commas_and_doubles_quotes() {
        let rows = vec![
            json!({"a": 1, "b": "x,y"}),
            json!({"a": 2, "b": "He said \"hi\""}),
        ];
        assert_eq!(
            to_csv(&rows, &["a", "b"]),
            "a,b\n1,\"x,y\"\n2,\"He said \"\"hi\"\"\""
        );
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let rows = vec![json!({"plate": "FLT-1", "notes": null}), json!({"plate": "FLT-2"})];
        assert_eq!(
            to_csv(&rows, &["plate", "notes", "mileage"]),
            "plate,notes,mileage\nFLT-1,,\nFLT-2,,"
        );
    }

    #[test]
    fn line_breaks_are_quoted() {
        let rows = vec![json!({"notes": "line one\nline two", "ok": true})];
        assert_eq!(
            to_csv(&rows, &["notes", "ok"]),
            "notes,ok\n\"line one\nline two\",true"
        );
    }

    #[test]
    fn no_rows_is_just_the_header() {
        assert_eq!(to_csv(&[], &["id", "status"]), "id,status");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.csv");
        write_csv(&path, &[json!({"id": "veh-001"})], &["id"]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id\nveh-001");
    }
}
