use assert_cmd::Command;

fn cli(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    cmd.env("BOOKSHELF_CONFIG_DIR", config_dir)
        .env_remove("BOOKSHELF_ENV")
        .env_remove("BOOKSHELF_SERVER__PORT");
    cmd
}

#[test]
fn settings_prints_defaults_as_json() {
    let dir = tempfile::tempdir().unwrap();

    let output = cli(dir.path()).arg("settings").output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["environment"], "local");
    assert_eq!(json["server"]["port"], 8080);
    assert_eq!(json["database"]["backend"], "sqlite");
}

#[test]
fn settings_reflect_config_files_and_env() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.toml"),
        "[database]\nbackend = \"memory\"\n",
    )
    .unwrap();

    let output = cli(dir.path())
        .env("BOOKSHELF_SERVER__PORT", "9090")
        .arg("settings")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["server"]["port"], 9090);
    assert_eq!(json["database"]["backend"], "memory");
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();

    cli(dir.path())
        .env("BOOKSHELF_ENV", "qa")
        .arg("settings")
        .assert()
        .failure();
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();

    let output = cli(dir.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("settings"));
}
