//
//  gerrit-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::fs;

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use tempfile::TempDir;

/// `gerritctl` with no ambient profile: the config directory points at an
/// empty temp dir and `GERRIT_*` variables are cleared.
fn gerritctl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gerritctl").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("APPDATA", home.path())
        .env_remove("GERRIT_URL")
        .env_remove("GERRIT_USERNAME")
        .env_remove("GERRIT_PASSWORD")
        .env_remove("GERRIT_AUTH_TYPE")
        .env_remove("GERRITCTL_CONFIG")
        .env_remove("GERRITCTL_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("change"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("group"))
        .stdout(predicate::str::contains("account"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_completion_bash() {
    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gerritctl"));
}

#[test]
fn test_missing_url_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .arg("version")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no Gerrit URL configured"));
}

#[test]
fn test_missing_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("absent.json");
    gerritctl(&home)
        .arg("--config")
        .arg(&path)
        .arg("version")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_version_from_json_config() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/a/config/server/version")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .with_body(")]}'\n\"3.9.1\"")
        .create();

    let home = TempDir::new().unwrap();
    let config = home.path().join("gerrit.json");
    fs::write(
        &config,
        format!(
            r#"{{"url": "{}", "username": "admin", "password": "secret"}}"#,
            server.url()
        ),
    )
    .unwrap();

    gerritctl(&home)
        .arg("--config")
        .arg(&config)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Connected with: admin"))
        .stdout(predicate::str::contains("✅ Version: 3.9.1"));
    mock.assert();
}

#[test]
fn test_flags_override_toml_config() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/config/server/version")
        .with_body(")]}'\n\"3.10.0\"")
        .create();

    let home = TempDir::new().unwrap();
    let config = home.path().join("gerrit.toml");
    fs::write(&config, "url = \"http://127.0.0.1:9\"\n").unwrap();

    gerritctl(&home)
        .arg("--config")
        .arg(&config)
        .args(["--url", &server.url(), "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Connected with: anonymous"))
        .stdout(predicate::str::contains("3.10.0"));
    mock.assert();
}

#[test]
fn test_project_list_verbose_prints_json() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/projects/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("p".into(), "plat".into()),
            Matcher::UrlEncoded("d".into(), "true".into()),
        ]))
        .with_body(
            r#")]}'
{"platform/build":{"id":"platform%2Fbuild","description":"Build tooling","state":"ACTIVE"}}"#,
        )
        .create();

    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .env("GERRIT_URL", server.url())
        .args(["-v", "project", "list", "--prefix", "plat", "--description"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Project Name: platform/build."))
        .stdout(predicate::str::contains("\"description\": \"Build tooling\""));
}

#[test]
fn test_change_show_not_found() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/changes/99")
        .with_status(404)
        .with_body("Not found: 99")
        .create();

    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .args(["--url", &server.url(), "change", "show", "99"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("unable to find change 99"));
}

#[test]
fn test_auth_failure_exit_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/a/accounts/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create();

    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .args(["--url", &server.url()])
        .args(["--username", "jane", "--password", "wrong"])
        .args(["account", "list"])
        .assert()
        .code(4);
}

#[test]
fn test_digest_auth_is_rejected() {
    let home = TempDir::new().unwrap();
    gerritctl(&home)
        .args(["--url", "https://gerrit.example.com"])
        .args(["--username", "jane", "--password", "pw", "--auth-type", "digest"])
        .arg("version")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("digest"));
}
