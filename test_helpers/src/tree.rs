//! Temporary hieradata trees.
//!
//! # Examples
//!
//! ```
//! use test_helpers::tree::DataTree;
//!
//! # fn main() -> anyhow::Result<()> {
//! let tree = DataTree::new()?;
//! tree.write("common.yaml", "greeting: hello\n")?;
//! let base = tree.base_config(&["yaml"], &["common"]);
//! assert_eq!(base["hierarchy"][0], "common");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// A temporary directory used as the datadir of every backend.
///
/// The directory is removed when the tree is dropped.
#[derive(Debug)]
pub struct DataTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl DataTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created or its
    /// path is not valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create hieradata directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary path {} is not UTF-8", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Root of the tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Create the directory `relative` (and its parents).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(relative);
        std::fs::create_dir_all(&path).with_context(|| format!("create {path}"))?;
        Ok(path)
    }

    /// A base configuration activating `backends` with this tree as every
    /// backend's datadir.
    #[must_use]
    pub fn base_config(&self, backends: &[&str], hierarchy: &[&str]) -> Value {
        let mut base = Map::new();
        base.insert("backends".to_owned(), json!(backends));
        base.insert("hierarchy".to_owned(), json!(hierarchy));
        for backend in backends {
            base.insert((*backend).to_owned(), json!({ "datadir": self.root.as_str() }));
        }
        Value::Object(base)
    }
}
