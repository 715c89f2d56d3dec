// Debian/Ubuntu: apt-get for packages, sysvinit `service` for daemons

use super::{each_service, install_with, Distribution};
use crate::capability::DistroKind;
use crate::command::CommandLine;
use crate::error::Result;
use crate::files::Filesystem;
use std::sync::Arc;

pub struct Debian {
    cli: Arc<dyn CommandLine>,
    files: Arc<dyn Filesystem>,
}

impl Debian {
    pub fn new(cli: Arc<dyn CommandLine>, files: Arc<dyn Filesystem>) -> Self {
        Self { cli, files }
    }
}

/// Package names out of the filtered `dpkg -l` listing, one per line.
/// Multiarch suffixes such as `:amd64` are dropped.
fn installed_names(listing: &str) -> impl Iterator<Item = &str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(':').next().unwrap_or(line))
}

impl Distribution for Debian {
    fn kind(&self) -> DistroKind {
        DistroKind::Debian
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        // grep narrows the listing by substring; the final comparison is exact
        let listing = self.cli.run(&format!(
            "dpkg -l | grep '^ii' | grep -F -- '{}' | awk '{{print $2}}'",
            package
        ))?;

        let found = installed_names(&listing).any(|name| name == package);
        Ok(found)
    }

    fn install_or_fail(&self, package: &str) -> Result<()> {
        install_with(
            self.cli.as_ref(),
            package,
            &format!("DEBIAN_FRONTEND=noninteractive apt-get install -y {}", package),
        )
    }

    fn restart_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo service {} restart", s));
    }

    fn stop_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo service {} stop", s));
    }

    fn enable_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo update-rc.d {} enable", s));
    }

    fn disable_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo update-rc.d {} disable", s));
    }

    fn files(&self) -> &dyn Filesystem {
        self.files.as_ref()
    }
}
