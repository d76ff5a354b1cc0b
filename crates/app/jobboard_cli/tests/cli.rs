use assert_cmd::Command;
use predicates::prelude::*;

fn jobboard() -> Command {
    let mut cmd = Command::cargo_bin("jobboard").unwrap();
    cmd.env_remove("DATABASE_URL").env("RUST_LOG", "info");
    cmd
}

#[test]
fn version_prints_package_and_version() {
    jobboard()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "jobboard_cli ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn help_lists_subcommands() {
    jobboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("migrate")
                .and(predicate::str::contains("seed"))
                .and(predicate::str::contains("version")),
        );
}

#[test]
fn seed_help_shows_database_options() {
    jobboard()
        .args(["seed", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--database-url")
                .and(predicate::str::contains("--bcrypt-cost")),
        );
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    jobboard().assert().failure().code(2);
}

#[test]
fn bad_database_url_exits_with_status_one() {
    jobboard()
        .args(["migrate", "--database-url", "not-a-database-url"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("ERROR"));
}
