//! Flipdeck - Tabular text parsing
//!
//! Turns comma-separated text into an ordered list of records keyed by the
//! header row. The split is deliberately naive: there is no quoting, so a
//! comma inside a value always starts a new field.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field delimiter for the input format
pub const DELIMITER: char = ',';

/// One parsed row: column name to value, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Look up the value for a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the row provided a value for this column
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Number of columns set on this record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Set a column. A repeated column name replaces the earlier value but
    /// keeps its original position.
    fn insert(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The records produced by one parse, in input row order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Column names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

/// Parse delimited text into a [`RecordSet`].
///
/// The first line is the header. Value `j` of every later line is stored under
/// `headers[j]`; short rows simply lack the trailing columns and extra fields
/// are dropped. Empty input yields an empty set with a single empty column.
pub fn parse(text: &str) -> RecordSet {
    let mut lines = trim(text).split('\n');

    let headers: Vec<String> = lines
        .next()
        .unwrap_or_default()
        .split(DELIMITER)
        .map(|h| trim(h).to_string())
        .collect();

    let records = lines
        .map(|line| {
            let mut record = Record::default();
            for (header, value) in headers.iter().zip(line.split(DELIMITER)) {
                record.insert(header, trim(value).to_string());
            }
            record
        })
        .collect();

    RecordSet { headers, records }
}

/// Trim whitespace and byte-order marks, so a BOM-prefixed export keeps its
/// first column name intact
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let set = parse("q,a\nWhat is 2+2?,4\nCapital of France?,Paris");
        assert_eq!(set.headers(), ["q", "a"]);
        assert_eq!(set.len(), 2);

        let first = set.get(0).unwrap();
        assert_eq!(first.get("q"), Some("What is 2+2?"));
        assert_eq!(first.get("a"), Some("4"));

        let second = set.get(1).unwrap();
        assert_eq!(second.get("q"), Some("Capital of France?"));
        assert_eq!(second.get("a"), Some("Paris"));
    }

    #[test]
    fn test_short_row_leaves_trailing_keys_absent() {
        let set = parse("q,a,tag\nX,Y");
        let record = set.get(0).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("q"), Some("X"));
        assert_eq!(record.get("a"), Some("Y"));
        assert!(!record.contains("tag"));
    }

    #[test]
    fn test_long_row_drops_extra_fields() {
        let set = parse("q,a\nX,Y,Z,W");
        let record = set.get(0).unwrap();
        assert_eq!(record.iter().collect::<Vec<_>>(), vec![("q", "X"), ("a", "Y")]);
    }

    #[test]
    fn test_header_only_is_empty() {
        let set = parse("question,answer\n");
        assert!(set.is_empty());
        assert_eq!(set.headers(), ["question", "answer"]);
    }

    #[test]
    fn test_empty_input() {
        let set = parse("");
        assert!(set.is_empty());
        assert_eq!(set.headers(), [""]);

        let set = parse("  \n\n ");
        assert!(set.is_empty());
        assert_eq!(set.headers(), [""]);
    }

    #[test]
    fn test_trims_whitespace_and_crlf() {
        let set = parse("\n question , answer \r\n  Why? ,  Because \r\n\n");
        assert_eq!(set.headers(), ["question", "answer"]);
        assert_eq!(set.len(), 1);
        let record = set.get(0).unwrap();
        assert_eq!(record.get("question"), Some("Why?"));
        assert_eq!(record.get("answer"), Some("Because"));
    }

    #[test]
    fn test_bom_header_is_trimmed() {
        let set = parse("\u{feff}question,answer\r\nWhat is 2+2?,4");
        assert_eq!(set.headers(), ["question", "answer"]);
        let record = set.get(0).unwrap();
        assert_eq!(record.get("question"), Some("What is 2+2?"));
        assert_eq!(record.get("answer"), Some("4"));
    }

    #[test]
    fn test_quoted_comma_still_splits() {
        let set = parse("q,a\n\"Hello, world\",greeting");
        let record = set.get(0).unwrap();
        assert_eq!(record.get("q"), Some("\"Hello"));
        assert_eq!(record.get("a"), Some("world\""));
    }

    #[test]
    fn test_interior_blank_line_keeps_first_column() {
        let set = parse("q,a\nX,Y\n\nZ,W");
        assert_eq!(set.len(), 3);
        let blank = set.get(1).unwrap();
        assert_eq!(blank.get("q"), Some(""));
        assert!(!blank.contains("a"));
    }

    #[test]
    fn test_duplicate_header_keeps_last_value() {
        let set = parse("q,q,a\nfirst,second,ans");
        let record = set.get(0).unwrap();
        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("q", "second"), ("a", "ans")]
        );
    }

    #[test]
    fn test_serialize_as_objects() {
        let set = parse("question,answer,tag\nWhat is H2O?,Water\nRed planet?,Mars,astro");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"question": "What is H2O?", "answer": "Water"},
                {"question": "Red planet?", "answer": "Mars", "tag": "astro"}
            ])
        );
    }
}
