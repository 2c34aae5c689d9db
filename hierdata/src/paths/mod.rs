//! Candidate path resolution.
//!
//! For every active backend (outer loop) and every hierarchy level (inner
//! loop) the datadir and level templates are rendered against the lookup
//! context. Levels whose templates reference a missing variable are skipped.
//! A rendered path naming a directory contributes every data file beneath it;
//! otherwise the backend's extension is appended and the file is used when
//! it exists.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use crate::backend::{Backend, BackendKind, BackendRegistry};
use crate::context::Context;
use crate::error::{HieraError, HieraResult};
use crate::template::Template;

/// A data file to search, together with the backend that reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path of the data file.
    pub path: Utf8PathBuf,
    /// Backend used to load the file.
    pub backend: BackendKind,
}

/// Ordered, de-duplicated collection of candidate paths.
#[derive(Debug, Default)]
struct CandidateList {
    paths: Vec<Candidate>,
    seen: HashSet<Utf8PathBuf>,
}

impl CandidateList {
    fn push_unique(&mut self, candidate: Candidate) {
        if !candidate.path.as_str().is_empty() && self.seen.insert(candidate.path.clone()) {
            self.paths.push(candidate);
        }
    }
}

/// Resolve every candidate path for `context`, backend-major then
/// hierarchy-minor.
///
/// # Errors
///
/// Returns [`HieraError::Load`] when a directory level cannot be walked.
pub fn resolve_candidates(
    base_path: &Utf8Path,
    registry: &BackendRegistry,
    hierarchy: &[Template],
    context: &Context,
) -> HieraResult<Vec<Candidate>> {
    let mut list = CandidateList::default();
    for backend in registry {
        let Some(datadir) = backend.datadir().render(context) else {
            tracing::trace!(backend = backend.name(), datadir = %backend.datadir(), "datadir skipped");
            continue;
        };
        for level in hierarchy {
            let Some(rendered) = level.render(context) else {
                tracing::trace!(
                    backend = backend.name(),
                    level = %level,
                    missing = ?level
                        .variables()
                        .filter(|name| context.get(name).is_none())
                        .collect::<Vec<_>>(),
                    "hierarchy level skipped"
                );
                continue;
            };
            let path = base_path.join(&datadir).join(rendered);
            if path.is_dir() {
                for file in walk_data_files(&path, registry, Some(backend))? {
                    list.push_unique(file);
                }
            } else {
                let file = Utf8PathBuf::from(format!("{path}.{}", backend.extension()));
                if file.is_file() {
                    list.push_unique(Candidate {
                        path: file,
                        backend: backend.kind(),
                    });
                }
            }
        }
    }
    tracing::debug!(candidates = list.paths.len(), "resolved candidate paths");
    Ok(list.paths)
}

/// Every data file below `dir`, sorted by file name at each level.
///
/// With `backend` given only that backend's files are returned; otherwise the
/// backend is inferred from each file's extension and files no active backend
/// claims are ignored.
///
/// # Errors
///
/// Returns [`HieraError::Load`] when the directory cannot be traversed or a
/// file name is not valid UTF-8.
pub fn walk_data_files(
    dir: &Utf8Path,
    registry: &BackendRegistry,
    backend: Option<&Backend>,
) -> HieraResult<Vec<Candidate>> {
    let walk_error = |err: Box<dyn std::error::Error + Send + Sync>| {
        HieraError::load(dir, backend.map_or("*", Backend::name), err)
    };
    let mut files = Vec::new();
    for item in WalkDir::new(dir)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = item.map_err(|err| walk_error(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(|path| {
            walk_error(format!("non UTF-8 path {}", path.display()).into())
        })?;
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let owner = match backend {
            Some(wanted) => wanted.matches_file(file_name).then_some(wanted),
            None => registry.infer(file_name),
        };
        if let Some(owner) = owner {
            files.push(Candidate {
                path,
                backend: owner.kind(),
            });
        }
    }
    Ok(files)
}
