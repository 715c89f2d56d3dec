// Per-distribution configuration literals
//
// Each table is an exhaustive match, so adding a `Capability` without
// filling it in for every distribution does not compile.

use crate::error::ValetError;
use std::fmt;
use std::str::FromStr;

/// Supported Linux distribution families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistroKind {
    Debian,
    Arch,
    Fedora,
}

impl DistroKind {
    pub const ALL: [DistroKind; 3] = [DistroKind::Debian, DistroKind::Arch, DistroKind::Fedora];

    pub fn name(&self) -> &'static str {
        match self {
            DistroKind::Debian => "debian",
            DistroKind::Arch => "arch",
            DistroKind::Fedora => "fedora",
        }
    }

    /// Resolve a capability through this distribution's table
    pub fn lookup(&self, key: Capability) -> &'static str {
        match self {
            DistroKind::Debian => debian(key),
            DistroKind::Arch => arch(key),
            DistroKind::Fedora => fedora(key),
        }
    }
}

impl fmt::Display for DistroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistroKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debian" | "ubuntu" => Ok(DistroKind::Debian),
            "arch" | "manjaro" => Ok(DistroKind::Arch),
            "fedora" => Ok(DistroKind::Fedora),
            other => Err(format!("unsupported distribution: {}", other)),
        }
    }
}

/// Abstract configuration values that differ between distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PhpBinaryPath,
    LatestPhpVersion,
    FpmServiceName,
    FpmConfigPath,
    Php56Version,
    Php56FpmService,
    Php56FpmConfig,
    Php55Version,
    Php55FpmService,
    Php55FpmConfig,
    ProxyDaemonUnitPath,
    ProxyFpmSocketPath,
    NetworkManagerServiceName,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::PhpBinaryPath,
        Capability::LatestPhpVersion,
        Capability::FpmServiceName,
        Capability::FpmConfigPath,
        Capability::Php56Version,
        Capability::Php56FpmService,
        Capability::Php56FpmConfig,
        Capability::Php55Version,
        Capability::Php55FpmService,
        Capability::Php55FpmConfig,
        Capability::ProxyDaemonUnitPath,
        Capability::ProxyFpmSocketPath,
        Capability::NetworkManagerServiceName,
    ];

    /// Short name used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Capability::PhpBinaryPath => "php-bin",
            Capability::LatestPhpVersion => "php-latest",
            Capability::FpmServiceName => "fpm-service",
            Capability::FpmConfigPath => "fpm-config",
            Capability::Php56Version => "php-56",
            Capability::Php56FpmService => "fpm56-service",
            Capability::Php56FpmConfig => "fpm56-config",
            Capability::Php55Version => "php-55",
            Capability::Php55FpmService => "fpm55-service",
            Capability::Php55FpmConfig => "fpm55-config",
            Capability::ProxyDaemonUnitPath => "systemd-caddy",
            Capability::ProxyFpmSocketPath => "systemd-caddy-fpm",
            Capability::NetworkManagerServiceName => "network-manager",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Capability {
    type Err = ValetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|capability| capability.key() == s)
            .ok_or_else(|| ValetError::UnknownCapability { key: s.to_string() })
    }
}

fn debian(key: Capability) -> &'static str {
    match key {
        Capability::PhpBinaryPath => "/usr/bin/php",
        Capability::LatestPhpVersion => "php7.0",
        Capability::FpmServiceName => "php7.0-fpm",
        Capability::FpmConfigPath => "/etc/php/7.0/fpm/pool.d/www.conf",
        Capability::Php56Version => "php5.6",
        Capability::Php56FpmService => "php5.6-fpm",
        Capability::Php56FpmConfig => "/etc/php/5.6/fpm/pool.d/www.conf",
        Capability::Php55Version => "php5",
        Capability::Php55FpmService => "php5-fpm",
        Capability::Php55FpmConfig => "/etc/php5/fpm/pool.d/www.conf",
        Capability::ProxyDaemonUnitPath => "/lib/systemd/system/caddy.service",
        Capability::ProxyFpmSocketPath => "/run/php/php7.0-fpm.sock",
        Capability::NetworkManagerServiceName => "network-manager",
    }
}

fn arch(key: Capability) -> &'static str {
    match key {
        Capability::PhpBinaryPath => "/usr/bin/php",
        Capability::LatestPhpVersion => "php",
        Capability::FpmServiceName => "php-fpm",
        Capability::FpmConfigPath => "/etc/php/php-fpm.d/www.conf",
        Capability::Php56Version => "php56",
        Capability::Php56FpmService => "php56-fpm",
        Capability::Php56FpmConfig => "/etc/php56/php-fpm.conf",
        Capability::Php55Version => "php55",
        Capability::Php55FpmService => "php55-fpm",
        Capability::Php55FpmConfig => "/etc/php55/php-fpm.conf",
        Capability::ProxyDaemonUnitPath => "/usr/lib/systemd/system/caddy.service",
        Capability::ProxyFpmSocketPath => "/run/php-fpm/php-fpm.sock",
        Capability::NetworkManagerServiceName => "NetworkManager",
    }
}

fn fedora(key: Capability) -> &'static str {
    match key {
        Capability::PhpBinaryPath => "/usr/bin/php",
        Capability::LatestPhpVersion => "php",
        Capability::FpmServiceName => "php-fpm",
        Capability::FpmConfigPath => "/etc/php-fpm.d/www.conf",
        Capability::Php56Version => "php56-php-fpm",
        Capability::Php56FpmService => "php56-php-fpm",
        Capability::Php56FpmConfig => "/opt/remi/php56/root/etc/php-fpm.conf",
        Capability::Php55Version => "php55-php-fpm",
        Capability::Php55FpmService => "php55-php-fpm",
        Capability::Php55FpmConfig => "/opt/remi/php55/root/etc/php-fpm.conf",
        Capability::ProxyDaemonUnitPath => "/lib/systemd/system/caddy.service",
        Capability::ProxyFpmSocketPath => "/var/run/php-fpm/php-fpm.sock",
        Capability::NetworkManagerServiceName => "NetworkManager",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_distro_defines_every_capability() {
        for distro in DistroKind::ALL {
            for capability in Capability::ALL {
                assert!(
                    !distro.lookup(capability).is_empty(),
                    "{} has no value for {}",
                    distro,
                    capability
                );
            }
        }
    }

    #[test]
    fn test_capability_keys_are_unique_and_parse_back() {
        let mut seen = std::collections::HashSet::new();
        for capability in Capability::ALL {
            assert!(seen.insert(capability.key()));
            assert_eq!(capability.key().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn test_unknown_capability_key() {
        let err = "php-42".parse::<Capability>().unwrap_err();
        assert!(matches!(err, ValetError::UnknownCapability { ref key } if key == "php-42"));
    }

    #[test]
    fn test_debian_table() {
        assert_eq!(DistroKind::Debian.lookup(Capability::LatestPhpVersion), "php7.0");
        assert_eq!(DistroKind::Debian.lookup(Capability::FpmServiceName), "php7.0-fpm");
        assert_eq!(
            DistroKind::Debian.lookup(Capability::Php55FpmConfig),
            "/etc/php5/fpm/pool.d/www.conf"
        );
    }

    #[test]
    fn test_fedora_table_uses_remi_collections() {
        assert_eq!(DistroKind::Fedora.lookup(Capability::Php56FpmService), "php56-php-fpm");
        assert_eq!(
            DistroKind::Fedora.lookup(Capability::NetworkManagerServiceName),
            "NetworkManager"
        );
    }

    #[test]
    fn test_distro_kind_from_str() {
        assert_eq!("Debian".parse::<DistroKind>().unwrap(), DistroKind::Debian);
        assert_eq!("manjaro".parse::<DistroKind>().unwrap(), DistroKind::Arch);
        assert_eq!(" fedora ".parse::<DistroKind>().unwrap(), DistroKind::Fedora);
        assert!("gentoo".parse::<DistroKind>().is_err());
    }
}
