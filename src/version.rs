// PHP version tags and version parsing

use crate::capability::{Capability, DistroKind};
use crate::error::{Result, ValetError};
use regex::Regex;
use semver::Version;
use std::fmt;

/// The PHP versions the platform layer knows how to supervise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkedPhp {
    Latest,
    Php56,
    Php55,
}

impl LinkedPhp {
    /// Resolution order. Latest must come first: on some layouts an older
    /// version literal is a substring of the latest binary's path.
    pub const PRIORITY: [LinkedPhp; 3] = [LinkedPhp::Latest, LinkedPhp::Php56, LinkedPhp::Php55];

    pub fn version_key(&self) -> Capability {
        match self {
            LinkedPhp::Latest => Capability::LatestPhpVersion,
            LinkedPhp::Php56 => Capability::Php56Version,
            LinkedPhp::Php55 => Capability::Php55Version,
        }
    }

    pub fn fpm_service_key(&self) -> Capability {
        match self {
            LinkedPhp::Latest => Capability::FpmServiceName,
            LinkedPhp::Php56 => Capability::Php56FpmService,
            LinkedPhp::Php55 => Capability::Php55FpmService,
        }
    }

    pub fn fpm_config_key(&self) -> Capability {
        match self {
            LinkedPhp::Latest => Capability::FpmConfigPath,
            LinkedPhp::Php56 => Capability::Php56FpmConfig,
            LinkedPhp::Php55 => Capability::Php55FpmConfig,
        }
    }

    /// Match a resolved PHP binary path against the known version literals
    pub fn from_link_target(target: &str, distro: DistroKind) -> Option<Self> {
        Self::PRIORITY
            .iter()
            .copied()
            .find(|tag| target.contains(distro.lookup(tag.version_key())))
    }
}

impl fmt::Display for LinkedPhp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkedPhp::Latest => f.write_str("latest"),
            LinkedPhp::Php56 => f.write_str("5.6"),
            LinkedPhp::Php55 => f.write_str("5.5"),
        }
    }
}

/// Parse the version out of `php -v` output
pub fn parse_php_version(output: &str) -> Result<Version> {
    // Matches "PHP 7.0.8-0ubuntu0.16.04.3 (cli)" and "PHP 8.4.0-dev"
    let re = Regex::new(r"PHP\s+(\d+)\.(\d+)\.(\d+)")
        .map_err(|e| ValetError::configuration(format!("Invalid version pattern: {}", e)))?;

    let captures = re
        .captures(output)
        .ok_or_else(|| ValetError::configuration("Could not parse PHP version from output"))?;

    let part = |index: usize| -> Result<u64> {
        captures[index]
            .parse::<u64>()
            .map_err(|_| ValetError::configuration("Invalid PHP version number"))
    };

    Ok(Version::new(part(1)?, part(2)?, part(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_php_version_standard() {
        let output = "PHP 7.0.8-0ubuntu0.16.04.3 (cli) ( NTS )\nCopyright (c) 1997-2016 The PHP Group";
        let version = parse_php_version(output).unwrap();

        assert_eq!(version, Version::new(7, 0, 8));
        assert_eq!(version.to_string(), "7.0.8");
    }

    #[test]
    fn test_parse_php_version_with_suffix() {
        let version = parse_php_version("PHP 8.4.0-dev (cli) (NTS)").unwrap();
        assert_eq!(version.major, 8);
        assert_eq!(version.minor, 4);
        assert_eq!(version.patch, 0);
    }

    #[test]
    fn test_parse_invalid_version() {
        assert!(parse_php_version("Not a PHP version").is_err());
    }

    #[test]
    fn test_link_target_matches_each_debian_version() {
        let distro = DistroKind::Debian;
        assert_eq!(
            LinkedPhp::from_link_target("/usr/bin/php7.0", distro),
            Some(LinkedPhp::Latest)
        );
        assert_eq!(
            LinkedPhp::from_link_target("/test/path/php5.6/test", distro),
            Some(LinkedPhp::Php56)
        );
        assert_eq!(
            LinkedPhp::from_link_target("/usr/bin/php5", distro),
            Some(LinkedPhp::Php55)
        );
        assert_eq!(LinkedPhp::from_link_target("/test/path/php42/test", distro), None);
    }

    #[test]
    fn test_latest_wins_over_older_substring() {
        let target = "/opt/php7.0/compat/php5.6/bin/php";
        assert_eq!(
            LinkedPhp::from_link_target(target, DistroKind::Debian),
            Some(LinkedPhp::Latest)
        );
    }

    #[test]
    fn test_php56_checked_before_php55() {
        // "php5" is a substring of "php5.6"
        assert_eq!(
            LinkedPhp::from_link_target("/usr/bin/php5.6", DistroKind::Debian),
            Some(LinkedPhp::Php56)
        );
    }

    #[test]
    fn test_capability_keys_per_tag() {
        assert_eq!(LinkedPhp::Php56.fpm_service_key(), Capability::Php56FpmService);
        assert_eq!(LinkedPhp::Php55.fpm_config_key(), Capability::Php55FpmConfig);
        assert_eq!(LinkedPhp::Latest.version_key(), Capability::LatestPhpVersion);
    }
}
