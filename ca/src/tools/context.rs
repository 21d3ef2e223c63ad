//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};
use tracing::debug;

/// Execution context shared by every tool call in a session
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Directory relative tool paths resolve against
    pub root: PathBuf,
}

impl ToolContext {
    /// Create a context rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!(?root, "ToolContext::new: called");
        Self { root }
    }

    /// Create a context rooted at the process working directory
    pub fn current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Resolve a tool path against the root
    ///
    /// Absolute paths pass through unchanged. Nothing is canonicalized and
    /// `..` components are kept, so a path may point outside the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let ctx = ToolContext::new("/work");
        assert_eq!(ctx.resolve("src/main.rs"), PathBuf::from("/work/src/main.rs"));
    }

    #[test]
    fn test_resolve_absolute_and_parent_paths() {
        let ctx = ToolContext::new("/work");
        assert_eq!(ctx.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(ctx.resolve("../other"), PathBuf::from("/work/../other"));
    }
}
