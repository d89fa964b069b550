use std::path::PathBuf;

use crate::association::{apply_best_effort, Association, Step, StepFailure, FS_ASSOCIATION};
use crate::registry::{Hive, KeyState, RegistryStore};
use crate::status::{ShellExtensionStatus, StatusReporter};

/// What a registration run did.
#[derive(Debug)]
pub struct RegistrationReport {
    pub status: ShellExtensionStatus,
    /// Builder steps that did not apply. Only populated for `Registered`;
    /// these never change the status.
    pub failures: Vec<StepFailure>,
}

impl RegistrationReport {
    fn status(status: ShellExtensionStatus) -> Self {
        Self {
            status,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Associates an extension with this application unless something already
/// claims it.
pub struct Registrar<S> {
    store: S,
    association: Association,
    working_dir: Option<PathBuf>,
}

impl<S: RegistryStore> Registrar<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            association: FS_ASSOCIATION,
            working_dir: None,
        }
    }

    pub fn with_association(mut self, association: Association) -> Self {
        self.association = association;
        self
    }

    /// Use `dir` instead of the process working directory for the icon path.
    /// `dir` must be absolute; an empty one is rejected at registration and
    /// the icon value is left out.
    pub fn with_working_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Whether the extension root key exists. Probe errors other than
    /// "not found" count as absent; the following create decides.
    pub fn is_registered(&self) -> bool {
        let ext = self.association.extension;
        match self.store.key_state(Hive::ClassesRoot, ext) {
            KeyState::Exists => true,
            KeyState::Absent => false,
            KeyState::Indeterminate(err) => {
                log::warn!("Cannot probe {}\\{}: {}", Hive::ClassesRoot, ext, err);
                false
            }
        }
    }

    pub fn register(&self) -> RegistrationReport {
        let ext = self.association.extension;

        if self.is_registered() {
            log::info!("{} is already associated", ext);
            return RegistrationReport::status(ShellExtensionStatus::AlreadyRegistered);
        }

        if let Err(err) = self.store.create_key(Hive::ClassesRoot, ext) {
            log::warn!("Cannot create {}\\{}: {}", Hive::ClassesRoot, ext, err);
            return RegistrationReport::status(ShellExtensionStatus::RegistrationFailed);
        }

        let mut failures = Vec::new();
        let working_dir = match self.resolve_working_dir() {
            Ok(dir) => Some(dir),
            Err(error) => {
                log::warn!("Cannot read the working directory: {}", error);
                failures.push(StepFailure {
                    step: Step::ResolveIconPath,
                    error,
                });
                None
            }
        };
        let plan = self.association.plan(working_dir.as_deref());
        failures.extend(apply_best_effort(&self.store, plan));

        log::info!(
            "{} associated with {} ({} failed steps)",
            ext,
            self.association.prog_id,
            failures.len()
        );
        RegistrationReport {
            status: ShellExtensionStatus::Registered,
            failures,
        }
    }

    /// Registers and hands the status to `reporter`, exactly once.
    pub fn register_and_report<R: StatusReporter + ?Sized>(
        &self,
        reporter: &mut R,
    ) -> ShellExtensionStatus {
        let status = self.register().status;
        reporter.report_status(status);
        status
    }

    fn resolve_working_dir(&self) -> std::io::Result<PathBuf> {
        match &self.working_dir {
            Some(dir) if dir.as_os_str().is_empty() => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty working directory",
            )),
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}
