// Arch Linux and derivatives: pacman and systemd

use super::{each_service, first_token_is, install_with, Distribution};
use crate::capability::DistroKind;
use crate::command::CommandLine;
use crate::error::Result;
use crate::files::Filesystem;
use std::sync::Arc;

pub struct Arch {
    cli: Arc<dyn CommandLine>,
    files: Arc<dyn Filesystem>,
}

impl Arch {
    pub fn new(cli: Arc<dyn CommandLine>, files: Arc<dyn Filesystem>) -> Self {
        Self { cli, files }
    }
}

impl Distribution for Arch {
    fn kind(&self) -> DistroKind {
        DistroKind::Arch
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        // "php 7.0.14-1" when installed, nothing on stdout otherwise
        let output = self.cli.run(&format!("pacman -Q {}", package))?;
        Ok(first_token_is(&output, package))
    }

    fn install_or_fail(&self, package: &str) -> Result<()> {
        install_with(
            self.cli.as_ref(),
            package,
            &format!("pacman -S --noconfirm {}", package),
        )
    }

    fn restart_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo systemctl restart {}", s));
    }

    fn stop_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo systemctl stop {}", s));
    }

    fn enable_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo systemctl enable {}", s));
    }

    fn disable_service(&self, services: &[&str]) {
        each_service(self.cli.as_ref(), services, |s| format!("sudo systemctl disable {}", s));
    }

    fn files(&self) -> &dyn Filesystem {
        self.files.as_ref()
    }
}
