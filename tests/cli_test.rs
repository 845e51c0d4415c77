use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

// Nothing listens on the discard port; these commands must fail before any request.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn test_cli_lists_commands() {
    let mut cmd = Command::new(cargo_bin!("checkout"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("create-order"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("pay"));
}

#[test]
fn test_create_order_rejects_zero_amount() {
    let mut cmd = Command::new(cargo_bin!("checkout"));
    cmd.args(["--base-url", UNREACHABLE])
        .args(["create-order", "--order-id", "1", "--amount", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be positive"));
}

#[test]
fn test_pay_with_missing_order_stays_idle() {
    let mut cmd = Command::new(cargo_bin!("checkout"));
    cmd.args(["--base-url", UNREACHABLE])
        .args(["pay", "--order-id", "0", "--amount", "199"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"state\": \"idle\""))
        .stderr(predicate::str::contains("Order ID is required"));
}

#[test]
fn test_verify_rejects_sub_paise_amount() {
    let mut cmd = Command::new(cargo_bin!("checkout"));
    cmd.args(["--base-url", UNREACHABLE]).args([
        "verify",
        "--order-id",
        "1",
        "--amount",
        "10.005",
        "--gateway-order-id",
        "order_abc",
        "--payment-id",
        "pay_xyz",
        "--signature",
        "sig",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("two decimal places"));
}
