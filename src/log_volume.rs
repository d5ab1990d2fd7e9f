//! The location a workload writes its log to and a verification pod reads it
//! from.
//!
//! Both sides are derived from the same [`LogVolume`], so the writer's
//! command and the reader's mount can't disagree on where the file is.

use snafu::{ensure, Snafu};

/// Where the volume is mounted unless told otherwise.
pub const LOG_MOUNT_PATH: &str = "/logs";

/// The log file name unless told otherwise.
pub const LOG_FILE_NAME: &str = "process-log.txt";

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum LogVolumeError {
    #[snafu(display("Volume claim name must not be empty."))]
    EmptyClaimName,
    #[snafu(display("Mount path {:?} is not absolute.", path))]
    RelativeMountPath { path: String },
    #[snafu(display("Log file name {:?} must be a single path component.", name))]
    InvalidFileName { name: String },
}

/// A persistent volume claim plus the path of a log file on it.
///
/// The claim is named after the run whose output it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogVolume {
    claim_name: String,
    mount_path: String,
    file_name: String,
}

impl LogVolume {
    /// The volume of the run `run_name`, with the log at
    /// `/logs/process-log.txt`.
    ///
    /// The claim name is not checked here; a malformed one is rejected by the
    /// cluster when the verification pod is created.
    pub fn for_run(run_name: impl Into<String>) -> Self {
        Self {
            claim_name: run_name.into(),
            mount_path: LOG_MOUNT_PATH.to_owned(),
            file_name: LOG_FILE_NAME.to_owned(),
        }
    }

    pub fn new(
        claim_name: impl Into<String>,
        mount_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Result<Self, LogVolumeError> {
        let claim_name = claim_name.into();
        let mount_path = mount_path.into();
        let file_name = file_name.into();

        ensure!(!claim_name.is_empty(), EmptyClaimNameSnafu);
        ensure!(
            mount_path.starts_with('/'),
            RelativeMountPathSnafu { path: mount_path }
        );
        ensure!(
            is_single_component(&file_name),
            InvalidFileNameSnafu { name: file_name }
        );

        Ok(Self {
            claim_name,
            mount_path,
            file_name,
        })
    }

    pub fn claim_name(&self) -> &str {
        &self.claim_name
    }

    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Absolute path of the log file inside a container that mounts the
    /// volume.
    pub fn log_file_path(&self) -> String {
        format!(
            "{}/{}",
            self.mount_path.trim_end_matches('/'),
            self.file_name
        )
    }

    /// A command that writes exactly `message` to the log file.
    pub fn write_command(&self, message: &str) -> Vec<String> {
        vec![
            "/bin/sh".to_owned(),
            "-c".to_owned(),
            format!(
                "printf '%s' {} > {}",
                shell_quote(message),
                shell_quote(&self.log_file_path())
            ),
        ]
    }
}

fn is_single_component(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && name != "." && name != ".."
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_run() {
        let volume = LogVolume::for_run("helloworld-run");

        assert_eq!(volume.claim_name(), "helloworld-run");
        assert_eq!(volume.mount_path(), "/logs");
        assert_eq!(volume.log_file_path(), "/logs/process-log.txt");
    }

    #[test]
    fn trailing_slash_on_mount_path() {
        let volume = LogVolume::new("run", "/workspace/", "out.txt").unwrap();
        assert_eq!(volume.log_file_path(), "/workspace/out.txt");
    }

    #[test]
    fn rejects_invalid_contracts() {
        assert_eq!(
            LogVolume::new("", "/logs", "log.txt"),
            Err(LogVolumeError::EmptyClaimName)
        );
        assert_eq!(
            LogVolume::new("run", "logs", "log.txt"),
            Err(LogVolumeError::RelativeMountPath {
                path: "logs".to_owned()
            })
        );
        for name in ["", ".", "..", "nested/log.txt"] {
            assert_eq!(
                LogVolume::new("run", "/logs", name),
                Err(LogVolumeError::InvalidFileName {
                    name: name.to_owned()
                })
            );
        }
    }

    #[test]
    fn write_command_targets_the_log_file() {
        let volume = LogVolume::for_run("run");

        assert_eq!(
            volume.write_command("do you want to build a snowman"),
            vec![
                "/bin/sh",
                "-c",
                "printf '%s' 'do you want to build a snowman' > '/logs/process-log.txt'",
            ]
        );
    }

    #[test]
    fn write_command_quotes_single_quotes() {
        let volume = LogVolume::for_run("run");

        assert_eq!(
            volume.write_command("it's cold")[2],
            r"printf '%s' 'it'\''s cold' > '/logs/process-log.txt'"
        );
    }
}
