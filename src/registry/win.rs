use winreg::enums::*;
use winreg::RegKey;

use super::{Hive, KeyState, RegistryStore};

fn predef(hive: Hive) -> RegKey {
    match hive {
        Hive::ClassesRoot => RegKey::predef(HKEY_CLASSES_ROOT),
        Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
    }
}

/// The machine registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinRegistry;

impl RegistryStore for WinRegistry {
    fn key_state(&self, hive: Hive, path: &str) -> KeyState {
        log::trace!("key_state {}\\{}", hive, path);
        // The opened key, if any, is dropped (closed) inside from_open_result.
        KeyState::from_open_result(predef(hive).open_subkey_with_flags(path, KEY_READ))
    }

    fn create_key(&self, hive: Hive, path: &str) -> std::io::Result<()> {
        // Non-volatile, default security descriptor.
        let (_key, disposition) = predef(hive).create_subkey_with_flags(path, KEY_WRITE)?;
        let created = matches!(disposition, RegDisposition::REG_CREATED_NEW_KEY);
        log::trace!("create_key {}\\{}: created={}", hive, path, created);
        Ok(())
    }

    fn set_string(&self, hive: Hive, path: &str, name: &str, value: &str) -> std::io::Result<()> {
        log::trace!("set_string {}\\{} [{:?}] = {:?}", hive, path, name, value);
        let key = predef(hive).open_subkey_with_flags(path, KEY_WRITE)?;
        key.set_value(name, &value)
    }
}
