use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use valet_linux::caddy::Caddy;
use valet_linux::command::{CommandLine, ShellCommandLine};
use valet_linux::config::{self, Config};
use valet_linux::files::{invoking_user, Filesystem, LocalFilesystem};
use valet_linux::host::LocalHost;
use valet_linux::php_fpm::PhpFpm;
use valet_linux::{version, Capability, DistroKind, Platform};

#[derive(Parser)]
#[command(name = "valet-linux")]
#[command(about = "Local PHP development environment for Linux", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install PHP-FPM and the Caddy daemon
    Install,

    /// Restart PHP-FPM and Caddy
    Restart,

    /// Stop PHP-FPM and Caddy
    Stop,

    /// Stop and remove the services
    Uninstall,

    /// Show the detected Linux distribution
    Distro,

    /// Show which PHP version is linked
    WhichPhp,

    /// Print a distribution specific configuration value
    Capability {
        /// Capability key, e.g. fpm-service
        key: String,

        /// Use this distribution instead of probing the host
        #[arg(long)]
        distro: Option<String>,
    },

    /// Show distribution, PHP and install information
    Status,
}

/// Host collaborators shared by every command
struct Context {
    cli: Arc<dyn CommandLine>,
    files: Arc<dyn Filesystem>,
    config: Config,
    platform: Platform,
}

impl Context {
    fn load() -> Result<Self> {
        let cli: Arc<dyn CommandLine> = Arc::new(ShellCommandLine);
        let files: Arc<dyn Filesystem> = Arc::new(LocalFilesystem);
        let config = config::load_config()?;

        let platform = Platform::detect(&LocalHost, config.forced_distro(), cli.clone(), files.clone());

        Ok(Self {
            cli,
            files,
            config,
            platform,
        })
    }

    fn php_fpm(&self) -> PhpFpm<'_> {
        PhpFpm::new(&self.platform, self.files.as_ref(), invoking_user())
    }

    fn caddy(&self) -> Result<Caddy<'_>> {
        Ok(Caddy::new(
            &self.platform,
            self.cli.as_ref(),
            self.files.as_ref(),
            config::get_valet_home()?,
        ))
    }

    fn require_root(&self) -> Result<()> {
        let uid = self.cli.run("id -u")?;
        if uid.trim() != "0" {
            return Err(anyhow!("This command must be run with sudo."));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = Context::load()?;

    match cli.command {
        Commands::Install => install(&mut ctx)?,
        Commands::Restart => restart(&ctx)?,
        Commands::Stop => stop(&ctx)?,
        Commands::Uninstall => uninstall(&ctx)?,
        Commands::Distro => show_distro(&ctx),
        Commands::WhichPhp => which_php(&ctx)?,
        Commands::Capability { key, distro } => print_capability(&ctx, &key, distro.as_deref())?,
        Commands::Status => show_status(&ctx)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn install(ctx: &mut Context) -> Result<()> {
    ctx.require_root()?;
    println!("Installing for {}...", ctx.platform.name().bold());

    ctx.php_fpm().install()?;

    let caddy = ctx.caddy()?;
    caddy.install()?;
    caddy.restart();

    let kind = ctx.platform.kind();
    ctx.config.record_detected(kind);
    ctx.config.record_install();
    config::save_config(&ctx.config)?;

    println!("\n{}", "Valet installed successfully!".green().bold());
    Ok(())
}

fn restart(ctx: &Context) -> Result<()> {
    ctx.require_root()?;

    ctx.php_fpm().restart()?;
    ctx.caddy()?.restart();

    println!("{}", "Valet services have been restarted.".green());
    Ok(())
}

fn stop(ctx: &Context) -> Result<()> {
    ctx.require_root()?;

    ctx.php_fpm().stop();
    ctx.caddy()?.stop();

    println!("{}", "Valet services have been stopped.".green());
    Ok(())
}

fn uninstall(ctx: &Context) -> Result<()> {
    ctx.require_root()?;

    ctx.caddy()?.uninstall()?;
    ctx.php_fpm().uninstall();

    println!("{}", "Valet has been uninstalled.".yellow());
    Ok(())
}

fn show_distro(ctx: &Context) {
    println!(
        "{} ({})",
        ctx.platform.name().bold(),
        ctx.platform.kind().to_string().dimmed()
    );
}

fn which_php(ctx: &Context) -> Result<()> {
    let linked = ctx.platform.linked_php()?;
    let package = ctx.platform.config(linked.version_key());

    println!("{} {}", "Linked PHP:".bold(), package.green());

    let php_bin = ctx.platform.config(Capability::PhpBinaryPath);
    if let Ok(version) = version::parse_php_version(&ctx.cli.run(&format!("{} -v", php_bin))?) {
        println!("{} {}", "Version:".bold(), version);
    }

    Ok(())
}

fn show_status(ctx: &Context) -> Result<()> {
    println!("{}", "valet-linux".bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\nPlatform:");
    println!("  Distribution: {} ({})", ctx.platform.name(), ctx.platform.kind());
    if ctx.config.forced_distro().is_some() {
        println!("  {}", "(set in config.toml)".dimmed());
    }

    match ctx.platform.linked_php() {
        Ok(linked) => {
            println!("  Linked PHP: {} [{}]", ctx.platform.config(linked.version_key()), linked);
            println!("  FPM service: {}", ctx.platform.config(linked.fpm_service_key()));
            println!("  FPM config: {}", ctx.platform.config(linked.fpm_config_key()));
        }
        Err(e) => println!("  Linked PHP: {}", e.to_string().red()),
    }

    println!("\nConfiguration:");
    println!("  Config file: {}", config::get_config_path()?.display());
    if let Some(last_install) = &ctx.config.settings.last_install {
        println!("  Last install: {}", last_install);
    }

    Ok(())
}

fn print_capability(ctx: &Context, key: &str, distro: Option<&str>) -> Result<()> {
    let capability: Capability = key.parse()?;

    let kind = match distro {
        Some(name) => name.parse::<DistroKind>().map_err(|e| anyhow!(e))?,
        None => ctx.platform.kind(),
    };

    println!("{}", kind.lookup(capability));
    Ok(())
}
