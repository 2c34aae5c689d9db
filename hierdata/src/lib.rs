//! Hierarchical configuration lookup.
//!
//! Values live in YAML or JSON data files arranged by a base configuration
//! into an ordered hierarchy of path templates such as
//! `nodes/%{hostname}` and `common`. A lookup renders those templates
//! against a context of variables, searches the resulting files in order,
//! optionally merges every hit, and resolves interpolation markup such as
//! `%{hiera('db.host')}` or `%{alias('servers')}` in the result.
//!
//! ```
//! use hierdata::{Context, Hiera, LookupOptions, MergeStrategy};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! std::fs::create_dir(dir.path().join("nodes"))?;
//! std::fs::write(
//!     dir.path().join("nodes/web01.yaml"),
//!     "ntp: [ntp1.local]\nurl: \"http://%{hostname}:%{hiera('port')}\"\n",
//! )?;
//! std::fs::write(dir.path().join("common.yaml"), "ntp: [pool.ntp.org]\nport: \"8080\"\n")?;
//!
//! let hiera = Hiera::builder(hierdata::BaseConfig::from_value(json!({
//!     "backends": ["yaml"],
//!     "hierarchy": ["nodes/%{hostname}", "common"],
//!     "yaml": {"datadir": dir.path().to_str()},
//! }))?)
//! .context(Context::new().with("hostname", "web01"))
//! .build()?;
//!
//! let first = hiera.get("ntp", &LookupOptions::new())?;
//! assert_eq!(first, Some(json!(["ntp1.local"])));
//!
//! let merged = hiera.get("ntp", &LookupOptions::new().with_merge(MergeStrategy::Array))?;
//! assert_eq!(merged, Some(json!(["ntp1.local", "pool.ntp.org"])));
//!
//! assert_eq!(hiera.get("url", &LookupOptions::new())?, Some(json!("http://web01:8080")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod context;
pub mod document;
mod error;
mod hiera;
mod interpolate;
pub mod merge;
pub mod paths;
pub mod template;

pub use backend::{Backend, BackendKind, BackendRegistry};
pub use cache::DocumentCache;
pub use config::BaseConfig;
pub use context::Context;
pub use document::Document;
pub use error::{HieraError, HieraResult};
pub use hiera::{Hiera, HieraBuilder, LookupOptions, ScopedHiera};
pub use merge::{Merge, MergeStrategy};
pub use paths::Candidate;
pub use template::Template;
