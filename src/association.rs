use std::fmt;
use std::path::Path;

use crate::registry::{Hive, RegistryStore};

const CONTENT_TYPE_KEY: &str = "Content Type";
const PERCEIVED_TYPE_KEY: &str = "PerceivedType";
const PROG_ID_KEY: &str = "ProgId";
const USER_CHOICE_ROOT: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\FileExt";

/// Fixed description of one file association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub extension: &'static str,
    pub prog_id: &'static str,
    pub description: &'static str,
    pub content_type: &'static str,
    pub perceived_type: &'static str,
    pub application: &'static str,
    pub command: &'static str,
    pub icon_file: &'static str,
}

/// The `.fs` project file system image.
pub const FS_ASSOCIATION: Association = Association {
    extension: ".fs",
    prog_id: "CS3410Project.fs",
    description: "CS3410 Project File System",
    content_type: "application/x-cs3410-fs",
    perceived_type: "compressed",
    application: "CS3410Project",
    command: "\"java -jar DS_Project.jar -b\" %1",
    icon_file: "tree.ico",
};

impl Association {
    pub fn icon_key(&self) -> String {
        format!("{}\\DefaultIcon", self.prog_id)
    }

    /// Relative to `HKEY_CLASSES_ROOT`; also the UserChoice `ProgId` value.
    pub fn application_path(&self) -> String {
        format!("Applications\\{}", self.application)
    }

    pub fn command_key(&self) -> String {
        format!("{}\\shell\\open\\command", self.application_path())
    }

    pub fn user_choice_key(&self) -> String {
        format!("{}\\{}\\UserChoice", USER_CHOICE_ROOT, self.extension)
    }

    /// Icon path under `working_dir`, joined with a single `\`. The result is
    /// only absolute if `working_dir` is.
    pub fn icon_path(&self, working_dir: &Path) -> String {
        let dir = working_dir.to_string_lossy();
        let dir = dir.trim_end_matches(|c: char| c == '\\' || c == '/');
        format!("{}\\{}", dir, self.icon_file)
    }

    /// Every write that follows the creation of the extension root key, in
    /// the order they are applied. Without a working directory the icon
    /// value is left out, since a relative path would break.
    pub fn plan(&self, working_dir: Option<&Path>) -> Vec<RegistryWrite> {
        use RegistryWrite::*;

        let root = self.extension.to_owned();
        let icon_key = self.icon_key();
        let command_key = self.command_key();
        let user_choice_key = self.user_choice_key();

        let mut plan = vec![
            SetString(Hive::ClassesRoot, root.clone(), String::new(), self.prog_id.to_owned()),
            SetString(
                Hive::ClassesRoot,
                root.clone(),
                CONTENT_TYPE_KEY.to_owned(),
                self.content_type.to_owned(),
            ),
            SetString(
                Hive::ClassesRoot,
                root,
                PERCEIVED_TYPE_KEY.to_owned(),
                self.perceived_type.to_owned(),
            ),
            CreateKey(Hive::ClassesRoot, self.prog_id.to_owned()),
            SetString(
                Hive::ClassesRoot,
                self.prog_id.to_owned(),
                String::new(),
                self.description.to_owned(),
            ),
            CreateKey(Hive::ClassesRoot, icon_key.clone()),
        ];
        if let Some(dir) = working_dir {
            plan.push(SetString(Hive::ClassesRoot, icon_key, String::new(), self.icon_path(dir)));
        }
        plan.extend(vec![
            CreateKey(Hive::ClassesRoot, command_key.clone()),
            SetString(Hive::ClassesRoot, command_key, String::new(), self.command.to_owned()),
            CreateKey(Hive::CurrentUser, user_choice_key.clone()),
            SetString(
                Hive::CurrentUser,
                user_choice_key,
                PROG_ID_KEY.to_owned(),
                self.application_path(),
            ),
        ]);
        plan
    }
}

/// One primitive registry write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWrite {
    CreateKey(Hive, String),
    /// Hive, key path, value name (empty for the default value), value.
    SetString(Hive, String, String, String),
}

impl RegistryWrite {
    pub fn apply<S: RegistryStore + ?Sized>(&self, store: &S) -> std::io::Result<()> {
        match self {
            RegistryWrite::CreateKey(hive, path) => store.create_key(*hive, path),
            RegistryWrite::SetString(hive, path, name, value) => {
                store.set_string(*hive, path, name, value)
            }
        }
    }
}

impl fmt::Display for RegistryWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryWrite::CreateKey(hive, path) => write!(f, "create {}\\{}", hive, path),
            RegistryWrite::SetString(hive, path, name, value) => {
                let name = if name.is_empty() { "(default)" } else { name.as_str() };
                write!(f, "set {}\\{} [{}] = {:?}", hive, path, name, value)
            }
        }
    }
}

/// A builder step, as recorded in a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Reading the working directory for the icon path. The icon value is
    /// not written when this fails.
    ResolveIconPath,
    Write(RegistryWrite),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::ResolveIconPath => f.write_str("resolve icon path"),
            Step::Write(write) => write.fmt(f),
        }
    }
}

/// A builder step that did not apply.
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub error: std::io::Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.error)
    }
}

/// Applies every step of `plan`, continuing past failures.
pub fn apply_best_effort<S: RegistryStore + ?Sized>(
    store: &S,
    plan: Vec<RegistryWrite>,
) -> Vec<StepFailure> {
    let mut failures = Vec::new();
    for step in plan {
        if let Err(error) = step.apply(store) {
            log::warn!("{} failed: {}", step, error);
            failures.push(StepFailure {
                step: Step::Write(step),
                error,
            });
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_path_single_separator() {
        let a = FS_ASSOCIATION;
        assert_eq!(
            a.icon_path(Path::new("C:\\Users\\me\\project")),
            "C:\\Users\\me\\project\\tree.ico"
        );
        assert_eq!(a.icon_path(Path::new("C:\\")), "C:\\tree.ico");
        assert_eq!(a.icon_path(Path::new("D:\\work\\\\")), "D:\\work\\tree.ico");
    }

    #[test]
    fn key_paths() {
        let a = FS_ASSOCIATION;
        assert_eq!(a.icon_key(), "CS3410Project.fs\\DefaultIcon");
        assert_eq!(
            a.command_key(),
            "Applications\\CS3410Project\\shell\\open\\command"
        );
        assert_eq!(
            a.user_choice_key(),
            "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\FileExt\\.fs\\UserChoice"
        );
    }

    #[test]
    fn plan_writes_root_values_first() {
        let plan = FS_ASSOCIATION.plan(Some(Path::new("C:\\p")));
        assert_eq!(plan.len(), 11);
        assert_eq!(
            plan[0],
            RegistryWrite::SetString(
                Hive::ClassesRoot,
                ".fs".to_owned(),
                String::new(),
                "CS3410Project.fs".to_owned()
            )
        );
        assert!(matches!(plan[3], RegistryWrite::CreateKey(Hive::ClassesRoot, _)));
        assert!(matches!(plan[10], RegistryWrite::SetString(Hive::CurrentUser, ..)));
    }

    #[test]
    fn plan_without_working_dir_skips_icon_value() {
        let plan = FS_ASSOCIATION.plan(None);
        assert_eq!(plan.len(), 10);
        assert!(plan.contains(&RegistryWrite::CreateKey(
            Hive::ClassesRoot,
            "CS3410Project.fs\\DefaultIcon".to_owned()
        )));
        assert!(!plan.iter().any(|step| matches!(
            step,
            RegistryWrite::SetString(_, path, _, _) if path.ends_with("DefaultIcon")
        )));
    }
}
