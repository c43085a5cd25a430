//! engine::index
//!
//! The staged index: a base tree snapshot plus pending edits.
//!
//! # Architecture
//!
//! The index is the single evolving tree view a change-set folds its
//! operations through. It never mutates the base tree; edits accumulate in
//! an overlay keyed by path, where `None` is a tombstone (deletion). The
//! merged view (overlay over base) is what each subsequent operation sees,
//! so later operations observe the effects of earlier ones.
//!
//! Writing the final tree delegates to the object store's structural-sharing
//! tree assembly; only touched subtrees are rewritten.

use std::collections::BTreeMap;

use crate::core::types::{Oid, TreePath};
use crate::git::{BlobRef, EntryKind, ObjectStore, StoreError};

/// A tree snapshot with pending edits layered on top.
#[derive(Debug)]
pub struct StagedIndex {
    /// The base tree OID, `None` for an empty base (unborn branch).
    base_tree: Option<Oid>,
    /// Pending edits: staged blob or tombstone per touched path.
    edits: BTreeMap<TreePath, Option<BlobRef>>,
}

impl StagedIndex {
    /// Create an index over `base_tree` with no pending edits.
    pub fn new(base_tree: Option<Oid>) -> Self {
        Self {
            base_tree,
            edits: BTreeMap::new(),
        }
    }

    /// The base tree this index was opened on.
    pub fn base_tree(&self) -> Option<&Oid> {
        self.base_tree.as_ref()
    }

    /// Look up the file at `path` in the merged view.
    ///
    /// Staged edits shadow the base tree; tombstones hide base entries.
    /// Directory entries are not files and yield `None`.
    pub fn lookup(
        &self,
        store: &ObjectStore,
        path: &TreePath,
    ) -> Result<Option<BlobRef>, StoreError> {
        if let Some(staged) = self.edits.get(path) {
            return Ok(staged.clone());
        }
        match &self.base_tree {
            Some(tree) => match store.tree_entry(tree, path)? {
                Some(info) if info.kind == EntryKind::Blob => Ok(Some(BlobRef {
                    id: info.id,
                    mode: info.mode,
                })),
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Check whether `path` denotes a directory in the merged view.
    ///
    /// True when a staged (non-tombstone) file lies under `path`, or the
    /// base tree carries a subtree there with at least one file that the
    /// overlay has not tombstoned.
    pub fn is_dir(&self, store: &ObjectStore, path: &TreePath) -> Result<bool, StoreError> {
        for (staged_path, entry) in &self.edits {
            if entry.is_some() && staged_path.is_under(path) {
                return Ok(true);
            }
        }
        match &self.base_tree {
            Some(tree) => match store.tree_entry(tree, path)? {
                Some(info) if info.kind == EntryKind::Tree => {
                    for file in store.tree_files_under(tree, path)? {
                        let tombstoned = self
                            .edits
                            .iter()
                            .any(|(p, e)| e.is_none() && p.as_str() == file);
                        if !tombstoned {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                _ => Ok(false),
            },
            None => Ok(false),
        }
    }

    /// Stage a blob at `path`, replacing any earlier edit there.
    pub fn stage(&mut self, path: TreePath, blob: BlobRef) {
        self.edits.insert(path, Some(blob));
    }

    /// Stage a tombstone at `path`.
    pub fn remove(&mut self, path: TreePath) {
        self.edits.insert(path, None);
    }

    /// Number of pending edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether no edits are staged.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Fold the pending edits into the base tree, returning the new tree OID.
    pub fn write_tree(&self, store: &ObjectStore) -> Result<Oid, StoreError> {
        store.write_tree(self.base_tree.as_ref(), &self.edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FileMode;

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    fn path(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    fn blob(c: char) -> BlobRef {
        BlobRef {
            id: oid(c),
            mode: FileMode::Blob,
        }
    }

    // Overlay behavior that needs no object store: an empty base tree.

    #[test]
    fn staged_entry_is_visible() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let mut index = StagedIndex::new(None);
        index.stage(path("a/b.txt"), blob('a'));

        let found = index.lookup(&store, &path("a/b.txt")).unwrap();
        assert_eq!(found, Some(blob('a')));
    }

    #[test]
    fn tombstone_hides_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let mut index = StagedIndex::new(None);
        index.stage(path("a.txt"), blob('a'));
        index.remove(path("a.txt"));

        assert_eq!(index.lookup(&store, &path("a.txt")).unwrap(), None);
    }

    #[test]
    fn staged_file_makes_ancestor_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let mut index = StagedIndex::new(None);
        index.stage(path("a/b/c.txt"), blob('c'));

        assert!(index.is_dir(&store, &path("a")).unwrap());
        assert!(index.is_dir(&store, &path("a/b")).unwrap());
        assert!(!index.is_dir(&store, &path("a/b/c.txt")).unwrap());
        assert!(!index.is_dir(&store, &path("other")).unwrap());
    }

    #[test]
    fn tombstoned_file_does_not_make_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let mut index = StagedIndex::new(None);
        index.remove(path("a/b.txt"));

        assert!(!index.is_dir(&store, &path("a")).unwrap());
    }

    #[test]
    fn tombstoning_every_base_file_empties_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let blob_id = store.write_blob(b"content").unwrap();
        let mut seed = BTreeMap::new();
        seed.insert(
            path("a/b.txt"),
            Some(BlobRef {
                id: blob_id.clone(),
                mode: FileMode::Blob,
            }),
        );
        seed.insert(
            path("a/c.txt"),
            Some(BlobRef {
                id: blob_id,
                mode: FileMode::Blob,
            }),
        );
        let base = store.write_tree(None, &seed).unwrap();

        let mut index = StagedIndex::new(Some(base));
        assert!(index.is_dir(&store, &path("a")).unwrap());

        // One surviving base file keeps the directory alive.
        index.remove(path("a/b.txt"));
        assert!(index.is_dir(&store, &path("a")).unwrap());

        // Tombstoning the last one frees the path for a file.
        index.remove(path("a/c.txt"));
        assert!(!index.is_dir(&store, &path("a")).unwrap());
    }

    #[test]
    fn restaging_into_tombstoned_directory_revives_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let blob_id = store.write_blob(b"content").unwrap();
        let mut seed = BTreeMap::new();
        seed.insert(
            path("a/b.txt"),
            Some(BlobRef {
                id: blob_id,
                mode: FileMode::Blob,
            }),
        );
        let base = store.write_tree(None, &seed).unwrap();

        let mut index = StagedIndex::new(Some(base));
        index.remove(path("a/b.txt"));
        assert!(!index.is_dir(&store, &path("a")).unwrap());

        index.stage(path("a/new.txt"), blob('a'));
        assert!(index.is_dir(&store, &path("a")).unwrap());
    }

    #[test]
    fn later_edit_replaces_earlier_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_empty_store(dir.path());

        let mut index = StagedIndex::new(None);
        index.stage(path("f.txt"), blob('a'));
        index.stage(path("f.txt"), blob('b'));

        assert_eq!(index.lookup(&store, &path("f.txt")).unwrap(), Some(blob('b')));
        assert_eq!(index.len(), 1);
    }

    fn open_empty_store(dir: &std::path::Path) -> ObjectStore {
        let status = std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(dir)
            .status()
            .expect("git init");
        assert!(status.success());
        ObjectStore::open(dir).unwrap()
    }
}
