use std::convert::TryFrom;
use std::fmt;

/// Outcome of a shell extension registration, as understood by the host.
///
/// The numeric codes are part of the host contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellExtensionStatus {
    /// The extension root key was absent and has been created.
    Registered,
    /// The extension root key already existed; nothing was written.
    AlreadyRegistered,
    /// Reserved for a removal path that does not exist yet.
    Deregistered,
    /// The extension root key was absent and could not be created.
    RegistrationFailed,
    /// Reserved, never produced.
    DeregistrationFailed,
}

impl ShellExtensionStatus {
    pub const fn code(self) -> i32 {
        match self {
            ShellExtensionStatus::Registered => 0,
            ShellExtensionStatus::AlreadyRegistered => 1,
            ShellExtensionStatus::Deregistered => 2,
            ShellExtensionStatus::RegistrationFailed => 3,
            ShellExtensionStatus::DeregistrationFailed => 4,
        }
    }

    /// Whether the extension ends up associated with this application.
    pub fn is_associated(self) -> bool {
        matches!(
            self,
            ShellExtensionStatus::Registered | ShellExtensionStatus::AlreadyRegistered
        )
    }
}

impl TryFrom<i32> for ShellExtensionStatus {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ShellExtensionStatus::Registered),
            1 => Ok(ShellExtensionStatus::AlreadyRegistered),
            2 => Ok(ShellExtensionStatus::Deregistered),
            3 => Ok(ShellExtensionStatus::RegistrationFailed),
            4 => Ok(ShellExtensionStatus::DeregistrationFailed),
            other => Err(other),
        }
    }
}

impl fmt::Display for ShellExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShellExtensionStatus::Registered => "registered",
            ShellExtensionStatus::AlreadyRegistered => "already registered",
            ShellExtensionStatus::Deregistered => "deregistered",
            ShellExtensionStatus::RegistrationFailed => "registration failed",
            ShellExtensionStatus::DeregistrationFailed => "deregistration failed",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Sink for hosts that expect the status through a callback.
pub trait StatusReporter {
    fn report_status(&mut self, status: ShellExtensionStatus);
}

impl<F> StatusReporter for F
where
    F: FnMut(i32),
{
    fn report_status(&mut self, status: ShellExtensionStatus) {
        self(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_host_contract() {
        let all = [
            ShellExtensionStatus::Registered,
            ShellExtensionStatus::AlreadyRegistered,
            ShellExtensionStatus::Deregistered,
            ShellExtensionStatus::RegistrationFailed,
            ShellExtensionStatus::DeregistrationFailed,
        ];
        for (expected, status) in all.iter().enumerate() {
            assert_eq!(status.code(), expected as i32, "{:?}", status);
            assert_eq!(ShellExtensionStatus::try_from(expected as i32), Ok(*status));
        }
        assert_eq!(ShellExtensionStatus::try_from(5), Err(5));
        assert_eq!(ShellExtensionStatus::try_from(-1), Err(-1));
    }

    #[test]
    fn closure_reporter_receives_code() {
        let mut received = Vec::new();
        let mut reporter = |code: i32| received.push(code);
        reporter.report_status(ShellExtensionStatus::RegistrationFailed);
        assert_eq!(received, vec![3]);
    }
}
