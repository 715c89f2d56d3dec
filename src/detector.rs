// Linux distribution detection
//
// The kernel release is checked first; when it carries no distro marker the
// first line of /etc/issue decides. Anything unrecognised is treated as
// Debian.

use crate::capability::DistroKind;
use crate::host::HostProbe;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Pick the distribution family for this host. Never fails.
pub fn detect_distro(probe: &dyn HostProbe) -> DistroKind {
    if let Some(kind) = probe.kernel_release().as_deref().and_then(kernel_hint) {
        debug!(distro = %kind, "Distribution detected from kernel release");
        return kind;
    }

    let kind = probe
        .issue_first_line()
        .as_deref()
        .and_then(issue_hint)
        .unwrap_or(DistroKind::Debian);

    debug!(distro = %kind, "Distribution detected from /etc/issue");
    kind
}

/// Look for a distro marker in a kernel release such as `5.10.0-1-MANJARO`,
/// `6.6.1-arch1-1` or `6.5.6-300.fc39.x86_64`
pub fn kernel_hint(release: &str) -> Option<DistroKind> {
    let release = release.to_lowercase();
    let tokens: Vec<&str> = release
        .split(|c: char| c == '-' || c == '.' || c == '_')
        .collect();

    if tokens.iter().any(|t| t.starts_with("arch") || *t == "manjaro") {
        return Some(DistroKind::Arch);
    }

    let fedora = tokens.iter().any(|t| {
        t.len() > 2 && t.starts_with("fc") && t[2..].chars().all(|c| c.is_ascii_digit())
    });
    if fedora {
        return Some(DistroKind::Fedora);
    }

    None
}

static ISSUE_PATTERNS: Lazy<[(Regex, DistroKind); 3]> = Lazy::new(|| {
    [
        (r"(?i)\b(arch|manjaro)", DistroKind::Arch),
        (r"(?i)\bfedora\b", DistroKind::Fedora),
        (r"(?i)\b(debian|ubuntu|mint|elementary|raspbian)\b", DistroKind::Debian),
    ]
    .map(|(pattern, kind)| (Regex::new(pattern).expect("valid /etc/issue pattern"), kind))
});

/// Match a distro name in the first line of `/etc/issue`
pub fn issue_hint(line: &str) -> Option<DistroKind> {
    ISSUE_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, kind)| *kind)
}
