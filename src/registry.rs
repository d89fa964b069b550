use std::fmt;

mod memory;
#[cfg(windows)]
mod win;

pub use memory::{MemoryRegistry, Snapshot};
#[cfg(windows)]
pub use win::WinRegistry;

/// Predefined registry root a key path is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hive {
    ClassesRoot,
    CurrentUser,
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hive::ClassesRoot => "HKEY_CLASSES_ROOT",
            Hive::CurrentUser => "HKEY_CURRENT_USER",
        })
    }
}

/// Result of probing a key without creating it.
#[derive(Debug)]
pub enum KeyState {
    Exists,
    Absent,
    /// The key could not be opened for a reason other than it missing,
    /// e.g. access denied.
    Indeterminate(std::io::Error),
}

impl KeyState {
    pub fn from_open_result<T>(result: std::io::Result<T>) -> Self {
        match result {
            Ok(_) => KeyState::Exists,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => KeyState::Absent,
            Err(err) => KeyState::Indeterminate(err),
        }
    }
}

/// The registry operations registration needs.
///
/// Paths use `\` separators and are relative to `hive`. Every handle an
/// implementation opens is released before the call returns.
pub trait RegistryStore {
    /// Opens `path` for read access only. Never creates anything.
    fn key_state(&self, hive: Hive, path: &str) -> KeyState;

    /// Opens or creates `path` (and any missing parents) with write access.
    fn create_key(&self, hive: Hive, path: &str) -> std::io::Result<()>;

    /// Writes a string value under an existing key. Fails if `path` does not
    /// exist; callers create it first.
    fn set_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> std::io::Result<()>;
}

impl<S: RegistryStore + ?Sized> RegistryStore for &S {
    fn key_state(&self, hive: Hive, path: &str) -> KeyState {
        (**self).key_state(hive, path)
    }

    fn create_key(&self, hive: Hive, path: &str) -> std::io::Result<()> {
        (**self).create_key(hive, path)
    }

    fn set_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> std::io::Result<()> {
        (**self).set_string(hive, path, name, value)
    }
}
