#[cfg(debug_assertions)]
use std::sync::Once;

use windows::Win32::Foundation::{E_FAIL, S_OK};
use windows::Win32::UI::Shell::{SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};
use windows_core::HRESULT;

use crate::registry::WinRegistry;
use crate::{Registrar, ShellExtensionStatus};

fn init_logging() {
    // Sets up logging to the Cargo.toml directory for debug purposes.
    #[cfg(debug_assertions)]
    {
        static LOGGING: Once = Once::new();
        LOGGING.call_once(|| {
            if let Err(err) = simple_logging::log_to_file(
                &format!("{}\\debug.log", env!("CARGO_MANIFEST_DIR")),
                log::LevelFilter::Trace,
            ) {
                eprintln!("fs-shellext: cannot open debug.log: {}", err);
            }
        });
    }
}

fn shell_change_notify() {
    unsafe { SHChangeNotify(SHCNE_ASSOCCHANGED, SHCNF_IDLIST, None, None) };
}

/// Associates `.fs` with this application in the machine registry and
/// notifies the shell when anything was written.
pub fn register_shell_extension_handler() -> ShellExtensionStatus {
    init_logging();
    log::trace!("register_shell_extension_handler");

    let report = Registrar::new(WinRegistry).register();
    if report.status == ShellExtensionStatus::Registered {
        shell_change_notify();
    }
    report.status
}

/// Registers the `.fs` association and returns the status code.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn RegisterShellExtensionHandler() -> i32 {
    register_shell_extension_handler().code()
}

#[no_mangle]
#[allow(non_snake_case)]
#[doc(hidden)]
pub extern "system" fn DllRegisterServer() -> HRESULT {
    if register_shell_extension_handler().is_associated() {
        S_OK
    } else {
        E_FAIL
    }
}
