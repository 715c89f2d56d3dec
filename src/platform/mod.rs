// Distribution abstraction: one contract, one implementation per distro family

mod arch;
mod debian;
mod fedora;

pub use arch::Arch;
pub use debian::Debian;
pub use fedora::Fedora;

use crate::capability::{Capability, DistroKind};
use crate::command::CommandLine;
use crate::detector;
use crate::error::{Result, ValetError};
use crate::files::Filesystem;
use crate::host::HostProbe;
use crate::version::LinkedPhp;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Package and service operations for one distribution family
pub trait Distribution: Send + Sync {
    fn kind(&self) -> DistroKind;

    /// Look up a distro specific literal
    fn config(&self, key: Capability) -> &'static str {
        self.kind().lookup(key)
    }

    /// Whether `package` is installed, by exact package name
    fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install `package` non-interactively, failing with an installation error
    fn install_or_fail(&self, package: &str) -> Result<()>;

    fn restart_service(&self, services: &[&str]);

    fn stop_service(&self, services: &[&str]);

    fn enable_service(&self, services: &[&str]);

    fn disable_service(&self, services: &[&str]);

    /// Which supported PHP version the PHP binary symlink points at
    fn linked_php(&self) -> Result<LinkedPhp> {
        resolve_linked_php(self.files(), self.kind())
    }

    fn files(&self) -> &dyn Filesystem;
}

/// Build the strategy object for a distribution family
pub fn distribution_for(
    kind: DistroKind,
    cli: Arc<dyn CommandLine>,
    files: Arc<dyn Filesystem>,
) -> Box<dyn Distribution> {
    match kind {
        DistroKind::Debian => Box::new(Debian::new(cli, files)),
        DistroKind::Arch => Box::new(Arch::new(cli, files)),
        DistroKind::Fedora => Box::new(Fedora::new(cli, files)),
    }
}

/// Announce and run an install command, turning a failure into an
/// installation error for `package`
pub(crate) fn install_with(cli: &dyn CommandLine, package: &str, command: &str) -> Result<()> {
    println!(
        "{} 🍻",
        format!("[{}] is not installed, installing it now...", package).green()
    );
    info!(package, command, "Installing package");

    cli.run_or_else(command, &|error_output| {
        eprintln!("{}", error_output.trim_end().red());
        ValetError::installation(package, error_output)
    })?;

    Ok(())
}

/// Issue one quiet service manager command per service
pub(crate) fn each_service(
    cli: &dyn CommandLine,
    services: &[&str],
    command: impl Fn(&str) -> String,
) {
    for service in services {
        cli.quietly(&command(service));
    }
}

/// First whitespace separated token of a package query, compared exactly
pub(crate) fn first_token_is(output: &str, package: &str) -> bool {
    output.split_whitespace().next() == Some(package)
}

fn resolve_linked_php(files: &dyn Filesystem, kind: DistroKind) -> Result<LinkedPhp> {
    let php_bin = Path::new(kind.lookup(Capability::PhpBinaryPath));

    if !files.is_link(php_bin) {
        return Err(ValetError::configuration("Unable to determine linked PHP."));
    }

    let resolved = files.read_link(php_bin)?;
    let resolved = resolved.to_string_lossy();
    debug!(target = %resolved, "Resolved PHP binary link");

    LinkedPhp::from_link_target(&resolved, kind).ok_or_else(|| {
        ValetError::configuration(format!(
            "Unable to determine linked PHP: {} is not a supported version.",
            resolved
        ))
    })
}

/// Entry point used by the installers.
///
/// Holds the distribution selected once at start-up and forwards every
/// operation to it.
pub struct Platform {
    distro: Box<dyn Distribution>,
}

impl Platform {
    pub fn new(distro: Box<dyn Distribution>) -> Self {
        Self { distro }
    }

    /// Probe the host (unless `forced` names a distro) and build the matching strategy
    pub fn detect(
        probe: &dyn HostProbe,
        forced: Option<DistroKind>,
        cli: Arc<dyn CommandLine>,
        files: Arc<dyn Filesystem>,
    ) -> Self {
        let kind = forced.unwrap_or_else(|| detector::detect_distro(probe));
        info!(distro = %kind, forced = forced.is_some(), "Selected distribution");
        Self::new(distribution_for(kind, cli, files))
    }

    pub fn kind(&self) -> DistroKind {
        self.distro.kind()
    }

    /// Get a human-readable name for the platform
    pub fn name(&self) -> &'static str {
        match self.kind() {
            DistroKind::Debian => "Debian/Ubuntu",
            DistroKind::Arch => "Arch Linux",
            DistroKind::Fedora => "Fedora",
        }
    }

    pub fn config(&self, key: Capability) -> &'static str {
        self.distro.config(key)
    }

    pub fn is_installed(&self, package: &str) -> Result<bool> {
        self.distro.is_installed(package)
    }

    pub fn install_or_fail(&self, package: &str) -> Result<()> {
        self.distro.install_or_fail(package)
    }

    /// Install `package` unless it is already present
    pub fn ensure_installed(&self, package: &str) -> Result<()> {
        if !self.is_installed(package)? {
            self.install_or_fail(package)?;
        }
        Ok(())
    }

    /// True if any supported PHP version is installed, latest checked first
    pub fn has_any_supported_php(&self) -> Result<bool> {
        for tag in LinkedPhp::PRIORITY {
            if self.is_installed(self.config(tag.version_key()))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn restart_service(&self, services: &[&str]) {
        self.distro.restart_service(services)
    }

    pub fn stop_service(&self, services: &[&str]) {
        self.distro.stop_service(services)
    }

    pub fn enable_service(&self, services: &[&str]) {
        self.distro.enable_service(services)
    }

    pub fn disable_service(&self, services: &[&str]) {
        self.distro.disable_service(services)
    }

    pub fn linked_php(&self) -> Result<LinkedPhp> {
        self.distro.linked_php()
    }
}
