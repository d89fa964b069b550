//! Associates the `.fs` extension with the CS3410 project application in the
//! Windows shell.

mod association;
#[cfg(windows)]
mod dll;
mod registrar;
pub mod registry;
mod status;

pub use association::{
    apply_best_effort, Association, RegistryWrite, Step, StepFailure, FS_ASSOCIATION,
};
pub use registrar::{Registrar, RegistrationReport};
pub use status::{ShellExtensionStatus, StatusReporter};

#[cfg(windows)]
pub use dll::register_shell_extension_handler;
