use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind};

use super::{Hive, KeyState, RegistryStore};

/// Registry paths and value names compare case-insensitively.
fn fold(s: &str) -> String {
    s.to_ascii_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Key {
    /// Folded value name -> value.
    values: BTreeMap<String, String>,
}

/// A point-in-time copy of a `MemoryRegistry`, comparable with `==`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    keys: BTreeMap<(Hive, String), Key>,
}

impl Snapshot {
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

/// An in-process registry with failure injection, for tests and benchmarks.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<BTreeMap<(Hive, String), Key>>,
    deny_read: RefCell<BTreeSet<(Hive, String)>>,
    deny_create: RefCell<BTreeSet<(Hive, String)>>,
    deny_write: RefCell<BTreeSet<(Hive, String)>>,
}

fn access_denied(hive: Hive, path: &str) -> Error {
    Error::new(
        ErrorKind::PermissionDenied,
        format!("access denied: {}\\{}", hive, path),
    )
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening `path` for read fails with access denied.
    pub fn deny_read(&self, hive: Hive, path: &str) {
        self.deny_read.borrow_mut().insert((hive, fold(path)));
    }

    /// Creating `path` fails with access denied.
    pub fn deny_create(&self, hive: Hive, path: &str) {
        self.deny_create.borrow_mut().insert((hive, fold(path)));
    }

    /// Writing values under `path` fails with access denied.
    pub fn deny_write(&self, hive: Hive, path: &str) {
        self.deny_write.borrow_mut().insert((hive, fold(path)));
    }

    pub fn contains_key(&self, hive: Hive, path: &str) -> bool {
        self.keys.borrow().contains_key(&(hive, fold(path)))
    }

    pub fn get_string(&self, hive: Hive, path: &str, name: &str) -> Option<String> {
        self.keys
            .borrow()
            .get(&(hive, fold(path)))
            .and_then(|key| key.values.get(&fold(name)).cloned())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            keys: self.keys.borrow().clone(),
        }
    }
}

impl RegistryStore for MemoryRegistry {
    fn key_state(&self, hive: Hive, path: &str) -> KeyState {
        let id = (hive, fold(path));
        if self.deny_read.borrow().contains(&id) {
            return KeyState::Indeterminate(access_denied(hive, path));
        }
        if self.keys.borrow().contains_key(&id) {
            KeyState::Exists
        } else {
            KeyState::Absent
        }
    }

    fn create_key(&self, hive: Hive, path: &str) -> std::io::Result<()> {
        // Missing parents are created along with the leaf. A denied key
        // anywhere on the chain fails the whole call before anything is
        // created.
        let mut chain = Vec::new();
        let mut prefix = String::new();
        for segment in path.split('\\').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(&fold(segment));
            chain.push((hive, prefix.clone()));
        }

        let deny_create = self.deny_create.borrow();
        if let Some((_, denied)) = chain.iter().find(|id| deny_create.contains(*id)) {
            return Err(access_denied(hive, denied));
        }

        let mut keys = self.keys.borrow_mut();
        for id in chain {
            keys.entry(id).or_default();
        }
        Ok(())
    }

    fn set_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> std::io::Result<()> {
        let id = (hive, fold(path));
        if self.deny_write.borrow().contains(&id) {
            return Err(access_denied(hive, path));
        }
        let mut keys = self.keys.borrow_mut();
        let key = keys.get_mut(&id).ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("key not found: {}\\{}", hive, path),
            )
        })?;
        key.values.insert(fold(name), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_key_creates_parents() {
        let reg = MemoryRegistry::new();
        reg.create_key(Hive::ClassesRoot, "Applications\\App\\shell")
            .expect("create");
        assert!(reg.contains_key(Hive::ClassesRoot, "Applications"));
        assert!(reg.contains_key(Hive::ClassesRoot, "applications\\APP"));
        assert!(!reg.contains_key(Hive::CurrentUser, "Applications"));
    }

    #[test]
    fn denied_parent_blocks_child_creation() {
        let reg = MemoryRegistry::new();
        reg.deny_create(Hive::ClassesRoot, ".fs");
        let err = reg
            .create_key(Hive::ClassesRoot, ".FS\\child")
            .expect_err("parent is denied");
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(!reg.contains_key(Hive::ClassesRoot, ".fs"));
        assert!(!reg.contains_key(Hive::ClassesRoot, ".fs\\child"));
    }

    #[test]
    fn set_string_requires_existing_key() {
        let reg = MemoryRegistry::new();
        let err = reg
            .set_string(Hive::ClassesRoot, ".fs", "", "x")
            .expect_err("key is missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!reg.contains_key(Hive::ClassesRoot, ".fs"));
    }

    #[test]
    fn denied_read_is_indeterminate() {
        let reg = MemoryRegistry::new();
        reg.deny_read(Hive::ClassesRoot, ".fs");
        match reg.key_state(Hive::ClassesRoot, ".fs") {
            KeyState::Indeterminate(err) => assert_eq!(err.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected {:?}", other),
        }
    }
}
