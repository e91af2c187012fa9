//! Revision sources
//!
//! Each [`RevisionSource`] inspects some ambient state once and returns a
//! [`SourceRevisionInfo`] value. Anything it cannot determine comes back as
//! `Unknown`; inspection never fails.

use crate::url::normalize_repository_url;
use otlab_core::keys::env;
use otlab_core::{RevisionField, SourceRevisionInfo};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Something that can report the deployed source revision
pub trait RevisionSource {
    /// Capture revision info; missing values are `Unknown`
    fn capture(&self) -> SourceRevisionInfo;
}

/// Reads the revision from a git working tree
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    workdir: PathBuf,
    git: PathBuf,
    remote: String,
}

impl GitRevisionSource {
    /// Inspect the working tree at `workdir` using `git` from `PATH`
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            git: PathBuf::from("git"),
            remote: "origin".to_string(),
        }
    }

    /// Use a specific git binary
    #[must_use]
    pub fn with_git_binary(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    /// Read the URL of a remote other than `origin`
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Working tree being inspected
    #[inline]
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git_output(&self, args: &[&str]) -> Option<String> {
        let output = Command::new(&self.git)
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            Ok(out) => {
                tracing::debug!(
                    ?args,
                    status = %out.status,
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "git query failed"
                );
                None
            }
            Err(e) => {
                tracing::warn!(git = %self.git.display(), error = %e, "git is not available");
                None
            }
        }
    }
}

impl RevisionSource for GitRevisionSource {
    fn capture(&self) -> SourceRevisionInfo {
        let commit_sha = self.git_output(&["rev-parse", "HEAD"]);
        let remote_key = format!("remote.{}.url", self.remote);
        let repository_url = self
            .git_output(&["config", "--get", &remote_key])
            .and_then(|url| normalize_repository_url(&url));

        SourceRevisionInfo {
            commit_sha: RevisionField::from_option(commit_sha),
            repository_url: RevisionField::from_option(repository_url),
        }
    }
}

/// Reads `DD_GIT_COMMIT_SHA` / `DD_GIT_REPOSITORY_URL` from a snapshot of
/// the environment
#[derive(Debug, Clone, Default)]
pub struct EnvRevisionSource {
    vars: BTreeMap<String, String>,
}

impl EnvRevisionSource {
    /// Snapshot the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Use explicit variables
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl RevisionSource for EnvRevisionSource {
    fn capture(&self) -> SourceRevisionInfo {
        SourceRevisionInfo {
            commit_sha: RevisionField::from_option(self.vars.get(env::DD_GIT_COMMIT_SHA).cloned()),
            repository_url: RevisionField::from_option(
                self.vars
                    .get(env::DD_GIT_REPOSITORY_URL)
                    .and_then(|url| normalize_repository_url(url)),
            ),
        }
    }
}

/// First known value per field wins, in source order
///
/// A field still unknown after every source is logged at `warn`.
#[derive(Default)]
pub struct ChainedRevisionSource {
    sources: Vec<Box<dyn RevisionSource + Send + Sync>>,
}

impl ChainedRevisionSource {
    /// Create empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower precedence than those already added
    #[must_use]
    pub fn then(mut self, source: impl RevisionSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for ChainedRevisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedRevisionSource")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl RevisionSource for ChainedRevisionSource {
    fn capture(&self) -> SourceRevisionInfo {
        let mut info = SourceRevisionInfo::unknown();
        for source in &self.sources {
            if info.is_complete() {
                break;
            }
            info = info.or(source.capture());
        }

        if !info.is_complete() {
            tracing::warn!(
                commit_sha = %info.commit_sha,
                repository_url = %info.repository_url,
                "source revision partially unknown"
            );
        }
        info
    }
}

/// Fixed revision, for callers that already know it
impl RevisionSource for SourceRevisionInfo {
    fn capture(&self) -> SourceRevisionInfo {
        self.clone()
    }
}
