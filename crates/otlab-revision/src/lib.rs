//! OTLab Revision
//!
//! Captures the source revision a deployment is built from. Sources never
//! fail: anything that cannot be determined is reported as `unknown`.
//!
//! # Example
//!
//! ```rust
//! use otlab_revision::{ChainedRevisionSource, EnvRevisionSource, RevisionSource};
//!
//! let source = ChainedRevisionSource::new().then(EnvRevisionSource::from_pairs([
//!     ("DD_GIT_COMMIT_SHA", "4f2a9c1"),
//! ]));
//! let info = source.capture();
//! assert_eq!(info.commit_sha.as_str(), "4f2a9c1");
//! assert_eq!(info.repository_url.as_str(), "unknown");
//! ```

#![warn(missing_docs)]

pub mod source;
pub mod url;

pub use source::{ChainedRevisionSource, EnvRevisionSource, GitRevisionSource, RevisionSource};
pub use url::normalize_repository_url;

use std::path::Path;

/// Default chain: environment variables first, then the git tree at `workdir`
#[must_use]
pub fn default_source(workdir: impl AsRef<Path>) -> ChainedRevisionSource {
    ChainedRevisionSource::new()
        .then(EnvRevisionSource::from_env())
        .then(GitRevisionSource::new(workdir.as_ref()))
}
