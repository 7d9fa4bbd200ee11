//! Delimited text tables
//!
//! Line-oriented CSV parsing and writing on top of the `csv` crate, plus a
//! plain tab splitter. Fields always come back as text.

use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::Path;
use tracing::{debug, warn};

/// Parse a block of CSV text, one record per line
///
/// The text is trimmed, split into lines and every line is trimmed again
/// before being parsed, so indented heredoc-style input works. Fields keep
/// their whitespace. Quoted fields may contain commas; a doubled quote is the
/// only escape inside quotes. Whitespace between a delimiter and an opening
/// quote is skipped. An empty line yields a record with a single empty field.
///
/// # Arguments
///
/// * `text` - CSV text
/// * `remove_first_line` - Drop the first record (a header row)
///
/// # Errors
///
/// Returns [`crate::HelperError::Csv`] if the reader rejects a line.
///
/// # Example
///
/// ```rust
/// use helperbox::tabular::csv_string_to_array;
///
/// let rows = csv_string_to_array("name,city\nJohn,\"Paris, TX\"", true).unwrap();
/// assert_eq!(rows, vec![vec!["John".to_string(), "Paris, TX".to_string()]]);
/// ```
pub fn csv_string_to_array(text: &str, remove_first_line: bool) -> Result<Vec<Vec<String>>> {
    let skip = usize::from(remove_first_line);
    text.trim()
        .split('\n')
        .skip(skip)
        .map(|line| parse_line(line.trim()))
        .collect()
}

fn parse_line(line: &str) -> Result<Vec<String>> {
    let line = strip_padding_before_quotes(line);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(vec![String::new()]);
    }
    Ok(record.iter().map(String::from).collect())
}

// Drops whitespace between a delimiter and an opening quote (`a, "b"`) so the
// reader sees a quoted field. Text inside quotes and unquoted fields is kept.
fn strip_padding_before_quotes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if in_quotes {
            out.push(c);
            if c == '"' {
                if chars.peek().is_some_and(|&(_, next)| next == '"') {
                    out.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if at_field_start && c.is_whitespace() && line[index..].trim_start().starts_with('"') {
            continue;
        }
        match c {
            ',' => at_field_start = true,
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            _ => at_field_start = false,
        }
        out.push(c);
    }
    out
}

/// Split text into lines, then each line on tab characters
///
/// No trimming and no quote handling.
///
/// # Example
///
/// ```rust
/// use helperbox::tabular::tab_delimited_string_to_array;
///
/// assert_eq!(
///     tab_delimited_string_to_array("a\tb\nc"),
///     vec![vec!["a", "b"], vec!["c"]]
/// );
/// ```
pub fn tab_delimited_string_to_array(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.split('\t').map(String::from).collect())
        .collect()
}

/// Write rows as CSV records to `path`, creating or truncating it
///
/// Returns whether every record was written and the file flushed. Failures
/// are logged, not returned.
pub fn put_array_to_csv_file<P, R, F>(path: P, rows: &[R]) -> bool
where
    P: AsRef<Path>,
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    let path = path.as_ref();
    match write_records(path, rows) {
        Ok(()) => {
            debug!("Wrote {} CSV records to {}", rows.len(), path.display());
            true
        }
        Err(e) => {
            warn!("Failed to write CSV file {}: {}", path.display(), e);
            false
        }
    }
}

fn write_records<R, F>(path: &Path, rows: &[R]) -> Result<()>
where
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    for row in rows {
        writer.write_record(row.as_ref().iter().map(|field| field.as_ref()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    const PEOPLE: &str = "
                First name,Last name
                John,Doe
                \"Richard\", \"Roe\"
            ";

    #[test]
    fn test_csv_string_to_array() {
        assert_eq!(csv_string_to_array("", false).unwrap(), strings(&[&[""]]));
        assert_eq!(csv_string_to_array("1", false).unwrap(), strings(&[&["1"]]));
        assert_eq!(csv_string_to_array("123", false).unwrap(), strings(&[&["123"]]));

        assert_eq!(
            csv_string_to_array(PEOPLE, false).unwrap(),
            strings(&[&["First name", "Last name"], &["John", "Doe"], &["Richard", "Roe"]])
        );
        assert_eq!(
            csv_string_to_array(PEOPLE, true).unwrap(),
            strings(&[&["John", "Doe"], &["Richard", "Roe"]])
        );
    }

    #[test]
    fn test_csv_quoting() {
        let rows = csv_string_to_array(r#"a,"b, c","say ""hi""""#, false).unwrap();
        assert_eq!(rows, strings(&[&["a", "b, c", r#"say "hi""#]]));

        let rows = csv_string_to_array("x,y\r\n1,2", false).unwrap();
        assert_eq!(rows, strings(&[&["x", "y"], &["1", "2"]]));

        let rows = csv_string_to_array("a,,b\n\nc", false).unwrap();
        assert_eq!(rows, strings(&[&["a", "", "b"], &[""], &["c"]]));
    }

    #[test]
    fn test_csv_keeps_field_whitespace() {
        let rows = csv_string_to_array("x,\" padded \",a b ", false).unwrap();
        assert_eq!(rows, strings(&[&["x", " padded ", "a b"]]));

        let rows = csv_string_to_array("a, b ,c", false).unwrap();
        assert_eq!(rows, strings(&[&["a", " b ", "c"]]));

        let rows = csv_string_to_array("1,  \" two \"\"2\"\" \"", false).unwrap();
        assert_eq!(rows, strings(&[&["1", " two \"2\" "]]));

        let rows = csv_string_to_array("1, \"a, b\", c", false).unwrap();
        assert_eq!(rows, strings(&[&["1", "a, b", " c"]]));

        let rows = csv_string_to_array("\"x, \"\"y\"\"\"", false).unwrap();
        assert_eq!(rows, strings(&[&["x, \"y\""]]));
    }

    #[test]
    fn test_tab_delimited_string_to_array() {
        assert_eq!(
            tab_delimited_string_to_array("a\tb\tc\nd\tf\tg"),
            strings(&[&["a", "b", "c"], &["d", "f", "g"]])
        );
        assert_eq!(
            tab_delimited_string_to_array(" a \t\"b\"\n"),
            strings(&[&[" a ", "\"b\""], &[""]])
        );
    }

    #[test]
    fn test_put_array_to_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmp.csv");
        assert!(!path.exists());

        assert!(put_array_to_csv_file(&path, &[["John", "Doe"], ["Richard", "Roe"]]));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "John,Doe\nRichard,Roe\n");

        assert!(put_array_to_csv_file(&path, &[vec!["only".to_string()]]));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "only\n");
    }

    #[test]
    fn test_put_array_to_csv_file_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("tmp.csv");
        assert!(!put_array_to_csv_file(&path, &[["a"]]));
    }

    #[test]
    fn test_csv_round_trip() {
        let source = "id,note\n1,\"comma, inside\"\n2,\"quote \"\"here\"\"\"\n3,plain";
        let parsed = csv_string_to_array(source, false).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("round.csv");
        assert!(put_array_to_csv_file(&path, &parsed));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv_string_to_array(&written, false).unwrap(), parsed);
        assert_eq!(parsed[2], vec!["2".to_string(), "quote \"here\"".to_string()]);
    }
}
