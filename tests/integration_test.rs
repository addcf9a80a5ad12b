//! Integration tests for the rental ledger CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given arguments and return stdout
fn run_ledger(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("rental-ledger").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize CSV for comparison (trim whitespace, drop blank lines)
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn assert_matches_expected(sample: &str, expected: &str) {
    let output = run_ledger(&[test_data_path(sample).as_str()]);
    let expected = fs::read_to_string(test_data_path(expected)).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_a_multiple_customers() {
    assert_matches_expected("sample_a.csv", "expected_a.csv");
}

#[test]
fn test_sample_b_redemption_across_checkouts() {
    assert_matches_expected("sample_b_redemption.csv", "expected_b.csv");
}

#[test]
fn test_sample_c_whitespace_handling() {
    assert_matches_expected("sample_c_whitespace.csv", "expected_c.csv");
}

#[test]
fn test_sample_d_edge_cases() {
    assert_matches_expected("sample_d_edge_cases.csv", "expected_d.csv");
}

#[test]
fn test_statement_flag_prints_rental_record() {
    let output = run_ledger(&[test_data_path("sample_b_redemption.csv").as_str(), "--statement"]);

    let expected = "Rental Record for Cy\n\
                    \tTRANSACTION\n\
                    \t\tRentals:\n\
                    \t\t\tEpic\t5.00\n\
                    \t\tFree Rentals:\n\
                    \t\tTransaction price: 5.00\t\tTransaction Renter Points: 12\n\
                    \tTRANSACTION\n\
                    \t\tRentals:\n\
                    \t\t\tCasino\t3.99\n\
                    \t\t\tAlien\t9.99\n\
                    \t\tFree Rentals:\n\
                    \t\t\tBrazil\t2.99\n\
                    \t\tTransaction price: 13.98\t\tTransaction Renter Points: 6\n\
                    Amount owed is 18.98\n\
                    You earned 8 frequent renter points\n";
    assert_eq!(output, expected);
}

#[test]
fn test_statement_flag_may_come_first() {
    let output = run_ledger(&["--statement", test_data_path("sample_a.csv").as_str()]);
    assert!(output.starts_with("Rental Record for Ann\n"));
    assert!(output.contains("\n\nRental Record for Bob\n"));
}

#[test]
fn test_generated_input_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "customer,age,tx,kind,title,price,points").unwrap();
    for tx in 1..=3 {
        writeln!(file, "Gus,28,{},rental,Movie{},2.00,5", tx, tx).unwrap();
    }

    let output = run_ledger(&[file.path().to_str().unwrap()]);

    // 10 points after the first checkout pay for the second; the third is paid again.
    let lines = normalize_csv(&output);
    assert_eq!(lines[1], "Gus,28,4.00,10");
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("rental-ledger").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("rental-ledger").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_ledger(&[test_data_path("sample_a.csv").as_str()]);
    assert!(output.starts_with("name,age,amount-owed,frequent-renter-points"));
}

#[test]
fn test_money_has_two_decimal_places() {
    let output = run_ledger(&[test_data_path("sample_a.csv").as_str()]);

    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split(',').collect();
        let owed = parts[2];
        let dot_pos = owed.find('.').unwrap();
        assert_eq!(owed.len() - dot_pos - 1, 2, "Expected 2 decimal places in: {}", owed);
    }
}
