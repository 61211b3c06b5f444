use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::{fs, io};

/// Per-slug view totals. Counts live in memory and optionally persist as
/// a JSON map so restarts keep the history.
pub struct ViewCounts {
    counts: HashMap<String, u64>,
    store_path: Option<PathBuf>,
}

impl ViewCounts {
    /// Counter without a backing file. Counts reset on restart.
    pub fn in_memory() -> Self {
        ViewCounts {
            counts: HashMap::new(),
            store_path: None,
        }
    }

    /// Loads totals from the store file. A store that does not exist yet
    /// is an empty counter, not an error.
    pub fn load(store_path: PathBuf) -> io::Result<Self> {
        let counts = match fs::read_to_string(&store_path) {
            Ok(buf) => serde_json::from_str(&buf)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        Ok(ViewCounts {
            counts,
            store_path: Some(store_path),
        })
    }

    pub fn increment(&mut self, slug: &str) -> u64 {
        let total = self.counts.entry(slug.to_string()).or_insert(0);
        *total += 1;
        *total
    }

    pub fn get(&self, slug: &str) -> u64 {
        self.counts.get(slug).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    /// Writes the totals to the store file. Goes through a sibling temp
    /// file and a rename so a crash mid-write cannot truncate the store.
    pub fn persist(&self) -> io::Result<()> {
        let Some(ref store_path) = self.store_path else {
            return Ok(());
        };

        let buf = serde_json::to_string_pretty(&self.counts)?;
        let tmp_path = store_path.with_extension("tmp");
        fs::write(&tmp_path, buf)?;
        fs::rename(&tmp_path, store_path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut counts = ViewCounts::in_memory();
        assert_eq!(counts.get("hello-world"), 0);
        assert_eq!(counts.increment("hello-world"), 1);
        assert_eq!(counts.increment("hello-world"), 2);
        assert_eq!(counts.increment("other-post"), 1);
        assert_eq!(counts.get("hello-world"), 2);
        assert_eq!(counts.get("other-post"), 1);
    }

    #[test]
    fn test_load_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let counts = ViewCounts::load(dir.path().join("views.json")).unwrap();
        assert_eq!(counts.get("anything"), 0);
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("views.json");

        let mut counts = ViewCounts::load(store.clone()).unwrap();
        counts.increment("hello-world");
        counts.increment("hello-world");
        counts.increment("other-post");
        counts.persist().unwrap();

        let reloaded = ViewCounts::load(store).unwrap();
        assert_eq!(reloaded.get("hello-world"), 2);
        assert_eq!(reloaded.get("other-post"), 1);
    }

    #[test]
    fn test_persist_in_memory_is_a_no_op() {
        let mut counts = ViewCounts::in_memory();
        counts.increment("hello-world");
        counts.persist().unwrap();
    }

    #[test]
    fn test_load_rejects_garbage_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("views.json");
        fs::write(&store, "not json at all").unwrap();
        assert!(ViewCounts::load(store).is_err());
    }
}
