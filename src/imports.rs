//! Per-file import table.
//!
//! Every generated file carries a deduplicated, insertion-order-stable set of
//! `(package identifier, import path)` pairs. New tables are seeded with two
//! baseline entries that generated code may always rely on: formatted output
//! support and the store client.

/// One `identifier "path"` import line in a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Package identifier
    pub name: String,
    /// Import path
    pub path: String,
}

/// Baseline imports present in every generated file, whether used or not.
/// Over-importing keeps generated code from ever referencing an absent symbol.
const BASELINE: [(&str, &str); 2] = [
    ("fmt", "fmt"),
    ("spanner", "cloud.google.com/go/spanner"),
];

/// Deduplicated, order-stable import set for one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
}

impl ImportTable {
    /// Create a table seeded with the baseline entries.
    pub fn new() -> Self {
        ImportTable {
            entries: BASELINE
                .iter()
                .map(|(name, path)| ImportEntry {
                    name: (*name).to_string(),
                    path: (*path).to_string(),
                })
                .collect(),
        }
    }

    /// Idempotent insert keyed by package identifier.
    ///
    /// If the identifier is already present the existing entry is returned,
    /// even when requested with a different path, so accumulation across many
    /// methods collapses naturally.
    pub fn get_or_add(&mut self, name: &str, path: &str) -> &ImportEntry {
        match self.entries.iter().position(|e| e.name == name) {
            Some(idx) => &self.entries[idx],
            None => {
                self.entries.push(ImportEntry {
                    name: name.to_string(),
                    path: path.to_string(),
                });
                let idx = self.entries.len() - 1;
                &self.entries[idx]
            }
        }
    }

    /// Entries in insertion order, baseline first.
    pub fn iter(&self) -> impl Iterator<Item = &ImportEntry> {
        self.entries.iter()
    }

    /// Number of entries, baseline included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the baseline entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry carries the given import path.
    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }
}

impl Default for ImportTable {
    fn default() -> Self {
        ImportTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_carries_baseline() {
        let table = ImportTable::new();
        assert_eq!(table.len(), 2);
        assert!(table.contains_path("fmt"));
        assert!(table.contains_path("cloud.google.com/go/spanner"));
    }

    #[test]
    fn test_get_or_add_deduplicates() {
        let mut table = ImportTable::new();
        table.get_or_add("bobpb", "example.com/gen/bobpb");
        table.get_or_add("bobpb", "example.com/gen/bobpb");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_same_identifier_different_path_returns_existing() {
        let mut table = ImportTable::new();
        table.get_or_add("pb", "example.com/a");
        let entry = table.get_or_add("pb", "example.com/b");
        assert_eq!(entry.path, "example.com/a");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut table = ImportTable::new();
        table.get_or_add("b", "path/b");
        table.get_or_add("a", "path/a");
        let names: Vec<&str> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fmt", "spanner", "b", "a"]);
    }
}
