//! Platform detection utilities

use log::debug;
use std::fs;
use std::process::{Command, Stdio};

/// Detect if running in WSL (Windows Subsystem for Linux)
///
/// Checks for WSL-specific indicators in /proc/version and environment variables.
pub fn is_wsl() -> bool {
    if let Ok(contents) = fs::read_to_string("/proc/version") {
        let lower = contents.to_lowercase();
        if lower.contains("microsoft") || lower.contains("wsl") {
            return true;
        }
    }

    std::env::var("WSL_DISTRO_NAME").is_ok()
}

/// Find the first external program that answers a version probe
///
/// Each candidate is run with `probe_arg` and output discarded; the first one
/// that exits successfully is returned.
pub fn find_program(candidates: &[&str], probe_arg: &str) -> Option<String> {
    for candidate in candidates {
        let status = Command::new(candidate)
            .arg(probe_arg)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                debug!("Found {} ({} succeeded)", candidate, probe_arg);
                return Some(candidate.to_string());
            }
            Ok(status) => debug!("{} {} exited with {}", candidate, probe_arg, status),
            Err(e) => debug!("{} not runnable: {}", candidate, e),
        }
    }
    None
}
