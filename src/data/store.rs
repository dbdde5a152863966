use super::model::{FileFormat, Table};

/// A parsed upload together with what the file listing shows about it.
#[derive(Debug, Clone)]
pub struct StoredTable {
    pub name: String,
    pub format: FileFormat,
    pub size_bytes: usize,
    pub table: Table,
}

impl StoredTable {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Tables keyed by file name, in upload order.
///
/// A name maps to at most one table and the first upload of a name wins;
/// later uploads under the same name are not parsed again.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    entries: Vec<StoredTable>,
}

impl TableStore {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Insert unless the name is already taken. Returns whether it was stored.
    pub fn insert(&mut self, entry: StoredTable) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&StoredTable> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StoredTable> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<StoredTable> {
        let idx = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredTable> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn entry(name: &str, rows: usize) -> StoredTable {
        StoredTable {
            name: name.into(),
            format: FileFormat::Csv,
            size_bytes: 2048,
            table: Table::new(vec![Column::numeric("v", vec![Some(1.0); rows])]),
        }
    }

    #[test]
    fn test_first_load_wins() {
        let mut store = TableStore::default();
        assert!(store.insert(entry("a.csv", 1)));
        assert!(!store.insert(entry("a.csv", 5)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.csv").unwrap().table.row_count(), 1);
    }

    #[test]
    fn test_keeps_upload_order_and_removes() {
        let mut store = TableStore::default();
        store.insert(entry("b.csv", 1));
        store.insert(entry("a.csv", 1));
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["b.csv", "a.csv"]);
        assert!(store.remove("b.csv").is_some());
        assert!(store.remove("b.csv").is_none());
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["a.csv"]);
        assert_eq!(store.get("a.csv").unwrap().size_kb(), 2.0);
    }
}
