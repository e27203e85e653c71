//! Shared E2E test helpers for `lightstack` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment that would leak the developer's own configuration.
const CONFIG_VARS: &[&str] = &[
    "LIGHTSTACK_DEBUG",
    "LIGHTSTACK_STORAGE_DIR",
    "LIGHTSTACK_LOGIN_PATH",
    "LIGHTSTACK_DASHBOARD_PATH",
    "RUST_LOG",
];

/// Build a Command for the `lightstack` binary isolated in a tempdir.
///
/// The tempdir is both HOME and the project root. Returns
/// (command, _guard); keep the guard alive for the test's duration.
pub fn lightstack_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("lightstack");
    cmd.timeout(TIMEOUT_BASIC);
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", tmp.path());
    cmd.args(["-C", tmp.path().to_str().expect("valid utf8")]);
    (cmd, tmp)
}

/// Write a fixture file into `dir`.
pub fn fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// Principal with a `System` directory, two screens, a button permission
/// and a `Reports` directory whose only screen has no view.
pub const ADMIN: &str = r#"{
  "code": 200,
  "data": {
    "id": 1,
    "username": "admin",
    "roles": ["admin"],
    "permissions": ["user:list"],
    "menus": [
      {"id": 1, "parentId": 0, "name": "System", "code": "sys", "type": "directory", "path": "/system", "sortOrder": 1},
      {"id": 3, "parentId": 1, "name": "Roles", "code": "roles", "type": "menu", "path": "/system/roles", "component": "system/roles", "sortOrder": 2},
      {"id": 2, "parentId": 1, "name": "Users", "code": "users", "type": "menu", "path": "/system/users", "component": "system/users", "sortOrder": 1},
      {"id": 4, "parentId": 2, "name": "Add", "code": "user:add", "type": "permission"},
      {"id": 5, "parentId": 0, "name": "Secret", "code": "secret", "type": "menu", "path": "/secret", "isHidden": true},
      {"id": 6, "parentId": 0, "name": "Reports", "code": "reports", "type": "directory", "path": "/reports", "sortOrder": 2,
       "children": [{"id": 7, "parentId": 6, "name": "Summary", "code": "summary", "type": "menu", "path": "summary", "component": "reports/summary"}]}
    ]
  }
}"#;

/// Views known to the host application.
pub const VIEWS: &str = "# host views\nsystem/users/index\nsystem/roles\n";
