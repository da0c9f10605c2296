//! Documentation side-table
//!
//! Field descriptions arrive in a line-oriented text format kept separate
//! from schema documents: unindented lines name a record kind, an indented
//! `- Members -----` line opens that kind's member section, and member lines
//! bind a field name to the quoted description at the end of the line. A
//! table can be loaded from several sources; later sources win per field.

use std::io::BufRead;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Field descriptions keyed by record kind, then field name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocTable {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl DocTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one documentation source into a fresh table
    pub fn parse(reader: impl BufRead) -> Result<Self> {
        let mut table = Self::new();
        table.load(reader)?;
        Ok(table)
    }

    /// Load one documentation source into this table, additively.
    ///
    /// Record kinds already present keep their existing fields; fields named
    /// again by this source are overwritten.
    pub fn load(&mut self, reader: impl BufRead) -> Result<()> {
        let section_re = Regex::new(r"^- (.*) [^ ]*$").unwrap(); // "- Members ----"
        let member_re = Regex::new(r#"^([^ ]+) [^"]*"(.*)""#).unwrap(); // name ... "desc"

        let mut current: Option<String> = None;
        let mut in_members = false;

        for line in reader.lines() {
            let line = line?;

            if line.trim().is_empty() {
                in_members = false;
                continue;
            }

            // Record kinds are the only lines that aren't indented
            if !line.starts_with(' ') {
                in_members = false;
                self.entries.entry(line.clone()).or_default();
                current = Some(line);
                continue;
            }

            let trimmed = line.trim();

            // Section header; only a Members section is consumed
            if trimmed.starts_with('-') {
                in_members = section_re
                    .captures(trimmed)
                    .map_or(false, |caps| &caps[1] == "Members");
                continue;
            }

            if !in_members {
                continue;
            }

            let Some(caps) = member_re.captures(trimmed) else {
                continue;
            };
            let description = &caps[2];
            if description.trim().is_empty() {
                continue;
            }

            let Some(kind) = &current else {
                return Err(SchemaError::MemberBeforeComponent);
            };
            self.entries
                .entry(kind.clone())
                .or_default()
                .insert(caps[1].to_string(), description.to_string());
        }

        Ok(())
    }

    /// Merge another table into this one; the other table wins per field
    pub fn merge(&mut self, other: DocTable) {
        for (kind, fields) in other.entries {
            self.entries.entry(kind).or_default().extend(fields);
        }
    }

    /// Look up the description for one field of a record kind
    pub fn get(&self, kind: &str, field: &str) -> Option<&str> {
        self.entries.get(kind)?.get(field).map(String::as_str)
    }

    /// All documented fields of a record kind, in source order
    pub fn fields(&self, kind: &str) -> Option<&IndexMap<String, String>> {
        self.entries.get(kind)
    }

    /// Record kinds present in the table
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of record kinds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no record kinds
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
PhysicsBodyComponent
  - Members ----------------------------
  mass       float   \"Mass of the body\"
  is_static  bool    \"Body never moves\"
  padding    int     \"\"

TransformComponent
  - Members ----------------------------
  position   vec2    \"World position\"
";

    #[test]
    fn test_parse_binds_kind_and_field() {
        let table = DocTable::parse(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(
            table.get("PhysicsBodyComponent", "mass"),
            Some("Mass of the body")
        );
        assert_eq!(
            table.get("TransformComponent", "position"),
            Some("World position")
        );
        assert_eq!(table.get("PhysicsBodyComponent", "position"), None);
    }

    #[test]
    fn test_empty_descriptions_are_skipped() {
        let table = DocTable::parse(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(table.get("PhysicsBodyComponent", "padding"), None);
    }

    #[test]
    fn test_blank_line_closes_section() {
        let text = "\
Comp
  - Members ----
  a x \"first\"

  b x \"after blank, not in members\"
";
        let table = DocTable::parse(Cursor::new(text)).unwrap();
        assert_eq!(table.get("Comp", "a"), Some("first"));
        assert_eq!(table.get("Comp", "b"), None);
    }

    #[test]
    fn test_non_members_sections_are_ignored() {
        let text = "\
Comp
  - Usage ----
  a x \"inside usage\"
  - Members ----
  b x \"inside members\"
";
        let table = DocTable::parse(Cursor::new(text)).unwrap();
        assert_eq!(table.get("Comp", "a"), None);
        assert_eq!(table.get("Comp", "b"), Some("inside members"));
    }

    #[test]
    fn test_member_before_header_is_an_error() {
        let text = "  - Members ----\n  field x \"orphaned\"\n";
        match DocTable::parse(Cursor::new(text)) {
            Err(SchemaError::MemberBeforeComponent) => {}
            other => panic!("Expected MemberBeforeComponent, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_is_additive_and_later_wins() {
        let mut table = DocTable::parse(Cursor::new(
            "Comp\n  - Members ----\n  a x \"old a\"\n  b x \"kept b\"\n",
        ))
        .unwrap();
        let newer = DocTable::parse(Cursor::new(
            "Comp\n  - Members ----\n  a x \"new a\"\nOther\n  - Members ----\n  c x \"new c\"\n",
        ))
        .unwrap();

        table.merge(newer);

        assert_eq!(table.get("Comp", "a"), Some("new a"));
        assert_eq!(table.get("Comp", "b"), Some("kept b"));
        assert_eq!(table.get("Other", "c"), Some("new c"));
    }

    #[test]
    fn test_repeated_load_merges_in_place() {
        let mut table = DocTable::new();
        table
            .load(Cursor::new("Comp\n  - Members ----\n  a x \"one\"\n"))
            .unwrap();
        table
            .load(Cursor::new("Comp\n  - Members ----\n  b x \"two\"\n"))
            .unwrap();
        assert_eq!(table.get("Comp", "a"), Some("one"));
        assert_eq!(table.get("Comp", "b"), Some("two"));
        assert_eq!(table.len(), 1);
    }
}
