//! Change tracking primitives
//!
//! Two small building blocks:
//!
//! - [`Signal`]: a value with a revision counter that only moves when the
//!   value actually changes.
//! - [`Effect`]: an observer keyed on a dependency snapshot. It runs its
//!   callback when the snapshot differs from the one recorded at the last
//!   successful run.

/// A value that counts its own changes
#[derive(Debug, Clone)]
pub struct Signal<T> {
    value: T,
    revision: u64,
}

impl<T: PartialEq> Signal<T> {
    /// Create a signal at revision 0
    pub fn new(value: T) -> Self {
        Self { value, revision: 0 }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of accepted changes since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the value
    ///
    /// Returns `false` and leaves the revision alone when `value` equals the
    /// current one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.revision += 1;
        true
    }
}

/// Observer that fires when its dependencies move
#[derive(Debug, Clone)]
pub struct Effect<D> {
    /// Dependencies seen by the last successful run
    committed: Option<D>,
}

impl<D> Default for Effect<D> {
    fn default() -> Self {
        Self { committed: None }
    }
}

impl<D: PartialEq + Clone> Effect<D> {
    /// Create an effect that has never run (first check is always stale)
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `deps` differ from the last successful run
    pub fn is_stale(&self, deps: &D) -> bool {
        self.committed.as_ref() != Some(deps)
    }

    /// Run `f` if `deps` are stale
    ///
    /// `deps` are only recorded when `f` succeeds, so a failed run stays due.
    /// Returns whether `f` was invoked.
    pub fn run<E>(&mut self, deps: &D, f: impl FnOnce(&D) -> Result<(), E>) -> Result<bool, E> {
        if !self.is_stale(deps) {
            return Ok(false);
        }
        f(deps)?;
        self.committed = Some(deps.clone());
        Ok(true)
    }
}
