// Host probing used for distribution detection

use std::fs;
use std::path::Path;

const KERNEL_RELEASE_PATH: &str = "/proc/sys/kernel/osrelease";
const ISSUE_PATH: &str = "/etc/issue";

/// Read-only questions asked about the host during detection
pub trait HostProbe {
    /// Kernel release string, e.g. `5.10.0-1-MANJARO`
    fn kernel_release(&self) -> Option<String>;

    fn path_exists(&self, path: &Path) -> bool;

    /// First line of `/etc/issue`
    fn issue_first_line(&self) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHost;

impl HostProbe for LocalHost {
    fn kernel_release(&self) -> Option<String> {
        fs::read_to_string(KERNEL_RELEASE_PATH)
            .ok()
            .map(|release| release.trim().to_string())
            .filter(|release| !release.is_empty())
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn issue_first_line(&self) -> Option<String> {
        if !self.path_exists(Path::new(ISSUE_PATH)) {
            return None;
        }

        fs::read_to_string(ISSUE_PATH)
            .ok()?
            .lines()
            .next()
            .map(|line| line.trim().to_string())
    }
}
