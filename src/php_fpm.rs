// PHP-FPM installation and supervision

use crate::capability::Capability;
use crate::error::{Result, ValetError};
use crate::files::Filesystem;
use crate::platform::Platform;
use crate::version::LinkedPhp;
use regex::{NoExpand, Regex};
use std::path::Path;
use tracing::info;

const LOG_DIR: &str = "/var/log";

pub struct PhpFpm<'a> {
    platform: &'a Platform,
    files: &'a dyn Filesystem,
    user: String,
}

impl<'a> PhpFpm<'a> {
    pub fn new(platform: &'a Platform, files: &'a dyn Filesystem, user: impl Into<String>) -> Self {
        Self {
            platform,
            files,
            user: user.into(),
        }
    }

    /// Install PHP if no supported version is present, point the FPM pool
    /// at the current user and (re)start it.
    pub fn install(&self) -> Result<()> {
        if !self.platform.has_any_supported_php()? {
            self.platform
                .ensure_installed(self.platform.config(Capability::LatestPhpVersion))?;
        }

        self.files.ensure_dir_exists(Path::new(LOG_DIR), true)?;

        self.update_configuration()?;

        self.platform.enable_service(&[self.fpm_service()?]);

        self.restart()
    }

    /// Rewrite the pool's `user` and `listen.owner` to the current user
    pub fn update_configuration(&self) -> Result<()> {
        let path = self.fpm_config_path()?;
        info!(path, user = %self.user, "Updating PHP-FPM pool configuration");

        let contents = self.files.get(Path::new(path))?;
        let contents = set_directive(&contents, "user", &self.user)?;
        let contents = set_directive(&contents, "listen.owner", &self.user)?;

        self.files.put(Path::new(path), &contents)
    }

    /// Stop every known FPM service, then start the linked one
    pub fn restart(&self) -> Result<()> {
        self.stop();

        self.platform.restart_service(&[self.fpm_service()?]);
        Ok(())
    }

    pub fn stop(&self) {
        self.platform.stop_service(&[
            self.platform.config(Capability::Php55FpmService),
            self.platform.config(Capability::Php56FpmService),
            self.platform.config(Capability::FpmServiceName),
        ]);
    }

    pub fn uninstall(&self) {
        self.stop();

        self.platform.disable_service(&[
            self.platform.config(Capability::Php55FpmService),
            self.platform.config(Capability::Php56FpmService),
            self.platform.config(Capability::FpmServiceName),
        ]);
    }

    /// FPM pool configuration file of the linked PHP version
    pub fn fpm_config_path(&self) -> Result<&'static str> {
        let linked = self.linked()?;
        Ok(self.platform.config(linked.fpm_config_key()))
    }

    /// FPM service name of the linked PHP version
    pub fn fpm_service(&self) -> Result<&'static str> {
        let linked = self.linked()?;
        Ok(self.platform.config(linked.fpm_service_key()))
    }

    fn linked(&self) -> Result<LinkedPhp> {
        self.platform.linked_php()
    }
}

/// Replace every `name = ...` line with `name = value`
fn set_directive(contents: &str, name: &str, value: &str) -> Result<String> {
    let pattern = format!(r"(?m)^{} = .+$", regex::escape(name));
    let re = Regex::new(&pattern)
        .map_err(|e| ValetError::configuration(format!("Invalid directive pattern: {}", e)))?;

    let replacement = format!("{} = {}", name, value);
    Ok(re.replace_all(contents, NoExpand(&replacement)).into_owned())
}
