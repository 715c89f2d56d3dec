use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn valet(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("valet-linux").unwrap();
    cmd.env("HOME", home.path()).env_remove("SUDO_USER");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    valet(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("capability"));
}

#[test]
fn test_capability_for_explicit_distro() {
    let home = TempDir::new().unwrap();

    valet(&home)
        .args(["capability", "fpm-service", "--distro", "debian"])
        .assert()
        .success()
        .stdout("php7.0-fpm\n");

    valet(&home)
        .args(["capability", "fpm56-config", "--distro", "fedora"])
        .assert()
        .success()
        .stdout("/opt/remi/php56/root/etc/php-fpm.conf\n");

    valet(&home)
        .args(["capability", "network-manager", "--distro", "arch"])
        .assert()
        .success()
        .stdout("NetworkManager\n");
}

#[test]
fn test_unknown_capability_fails() {
    let home = TempDir::new().unwrap();
    valet(&home)
        .args(["capability", "php-42", "--distro", "debian"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown capability: php-42"));
}

#[test]
fn test_unsupported_distro_fails() {
    let home = TempDir::new().unwrap();
    valet(&home)
        .args(["capability", "php-bin", "--distro", "gentoo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported distribution"));
}

#[test]
fn test_config_override_selects_distro() {
    let home = TempDir::new().unwrap();
    let valet_home = home.path().join(".valet");
    std::fs::create_dir_all(&valet_home).unwrap();
    std::fs::write(valet_home.join("config.toml"), "[settings]\ndistro = \"fedora\"\n").unwrap();

    valet(&home)
        .arg("distro")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fedora"));

    valet(&home)
        .args(["capability", "php-latest"])
        .assert()
        .success()
        .stdout("php\n");
}

#[test]
fn test_distro_always_succeeds() {
    let home = TempDir::new().unwrap();
    valet(&home).arg("distro").assert().success();
}
