//! Filesystem reads for the plain-text backends.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use super::BackendError;

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` via `cap-std` and read the named file.
pub(crate) fn read_file(path: &Utf8Path) -> Result<String, BackendError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other("cannot determine file name for data file path"))?;
    let dir = Dir::open_ambient_dir(parent_or_dot(path), ambient_authority())?;
    Ok(dir.read_to_string(file_name)?)
}
