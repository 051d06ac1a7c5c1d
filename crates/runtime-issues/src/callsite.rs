//! # Call-Site Cache
//!
//! Remembers which `(file, line)` pairs have already raised an issue.
//!
//! A runtime issue is meant to be noticed, not counted. The first raise from a
//! given call site goes through; every later raise from the same site is
//! dropped for the lifetime of the owning [`crate::Logger`].

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A source location that raises issues
///
/// Equality and hashing use the *contents* of `file`, never its address.
/// `file!()` can hand out distinct copies of the same path across codegen
/// units, and those must still count as one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite
{
    /// Source file, as produced by `file!()`
    pub file: &'static str,
    /// Line within `file`, as produced by `line!()`
    pub line: u32,
}

impl CallSite
{
    /// Create a call site from a file and line
    ///
    /// ## Example
    ///
    /// ```rust
    /// use runtime_issues::CallSite;
    ///
    /// let site = CallSite::new(file!(), line!());
    /// assert!(site.line > 0);
    /// ```
    pub const fn new(file: &'static str, line: u32) -> Self
    {
        Self { file, line }
    }
}

impl fmt::Display for CallSite
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Set of call sites that have already raised
///
/// Entries are only ever inserted. The set is guarded by a mutex so that two
/// threads raising from the same site cannot both get through; a poisoned
/// lock is recovered instead of propagating the panic into the caller.
#[derive(Debug, Default)]
pub struct CallsiteCache
{
    raised: Mutex<HashSet<CallSite>>,
}

impl CallsiteCache
{
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns whether `site` should raise, recording it if so.
    ///
    /// Only the first call for a given site returns `true`.
    pub fn should_raise(&self, site: CallSite) -> bool
    {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner).insert(site)
    }

    /// Whether `site` has already raised.
    pub fn contains(&self, site: &CallSite) -> bool
    {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner).contains(site)
    }

    /// Number of distinct call sites recorded.
    pub fn len(&self) -> usize
    {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_first_raise_wins()
    {
        let cache = CallsiteCache::new();
        let site = CallSite::new("src/view.rs", 42);

        assert!(cache.should_raise(site));
        assert!(!cache.should_raise(site));
        assert!(!cache.should_raise(site));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_same_file_other_line_is_new()
    {
        let cache = CallsiteCache::new();

        assert!(cache.should_raise(CallSite::new("src/view.rs", 1)));
        assert!(cache.should_raise(CallSite::new("src/view.rs", 2)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_display()
    {
        assert_eq!(CallSite::new("src/lib.rs", 7).to_string(), "src/lib.rs:7");
    }
}
