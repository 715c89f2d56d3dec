// Caddy web server daemon installation

use crate::capability::Capability;
use crate::command::CommandLine;
use crate::error::Result;
use crate::files::Filesystem;
use crate::platform::Platform;
use std::path::{Path, PathBuf};
use tracing::info;

const CADDYFILE_STUB: &str = include_str!("../stubs/Caddyfile");
const SERVICE_STUB: &str = include_str!("../stubs/caddy.service");

const CADDY_PACKAGE: &str = "caddy";
const CADDY_BIN: &str = "/usr/bin/caddy";
const CADDY_UNIT: &str = "caddy.service";

pub struct Caddy<'a> {
    platform: &'a Platform,
    cli: &'a dyn CommandLine,
    files: &'a dyn Filesystem,
    valet_home: PathBuf,
}

impl<'a> Caddy<'a> {
    pub fn new(
        platform: &'a Platform,
        cli: &'a dyn CommandLine,
        files: &'a dyn Filesystem,
        valet_home: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            cli,
            files,
            valet_home: valet_home.into(),
        }
    }

    fn daemon_path(&self) -> &'static Path {
        Path::new(self.platform.config(Capability::ProxyDaemonUnitPath))
    }

    pub fn install(&self) -> Result<()> {
        self.platform.ensure_installed(CADDY_PACKAGE)?;
        self.install_caddy_file()?;
        self.install_caddy_directory()?;
        self.install_caddy_daemon()
    }

    /// Write the main Caddyfile into the valet home directory
    pub fn install_caddy_file(&self) -> Result<()> {
        self.files.ensure_dir_exists(&self.valet_home, true)?;
        self.files.ensure_dir_exists(&self.valet_home.join("Log"), true)?;

        let contents = CADDYFILE_STUB
            .replace("FPM_ADDRESS", self.platform.config(Capability::ProxyFpmSocketPath))
            .replace("VALET_HOME_PATH", &self.valet_home.to_string_lossy());

        self.files
            .put_as_user(&self.valet_home.join("Caddyfile"), &contents)
    }

    /// Directory holding the per-site Caddy definitions
    pub fn install_caddy_directory(&self) -> Result<()> {
        let caddy_directory = self.valet_home.join("Caddy");

        if !self.files.is_dir(&caddy_directory) {
            self.files.ensure_dir_exists(&caddy_directory, true)?;
        }

        self.files.touch_as_user(&caddy_directory.join(".keep"))
    }

    /// Install the systemd unit and enable it
    pub fn install_caddy_daemon(&self) -> Result<()> {
        let contents = SERVICE_STUB
            .replace("CADDY_BIN", CADDY_BIN)
            .replace("VALET_HOME_PATH", &self.valet_home.to_string_lossy());

        info!(path = %self.daemon_path().display(), "Installing Caddy daemon");
        self.files.put(self.daemon_path(), &contents)?;

        self.cli.quietly("systemctl daemon-reload");
        self.cli.quietly(&format!("systemctl enable {}", CADDY_UNIT));
        Ok(())
    }

    pub fn restart(&self) {
        self.cli.quietly("systemctl daemon-reload");
        self.cli.quietly(&format!("systemctl restart {}", CADDY_UNIT));
    }

    pub fn stop(&self) {
        self.cli.quietly(&format!("systemctl stop {}", CADDY_UNIT));
    }

    /// Stop, disable and remove the daemon
    pub fn uninstall(&self) -> Result<()> {
        self.stop();
        self.cli.quietly(&format!("systemctl disable {}", CADDY_UNIT));

        self.files.unlink(self.daemon_path())?;
        self.cli.quietly("systemctl daemon-reload");
        Ok(())
    }
}
