#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Unit tests for CLI argument parsing

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_compose_command_parses() {
    let cli = Cli::try_parse_from(["apigw-compose", "compose", "--config", "compose.yaml"]).unwrap();

    match cli.command {
        Commands::Compose { config, output, domain_name, .. } => {
            assert_eq!(config.to_string_lossy(), "compose.yaml");
            assert!(output.is_none());
            assert!(domain_name.is_none());
        }
        _ => panic!("Expected Compose command"),
    }
}

#[test]
fn test_domain_flags_require_each_other() {
    let partial = Cli::try_parse_from([
        "apigw-compose",
        "compose",
        "--config",
        "compose.yaml",
        "--domain-name",
        "api.example.com",
    ]);
    assert!(partial.is_err());

    let full = Cli::try_parse_from([
        "apigw-compose",
        "compose",
        "--config",
        "compose.yaml",
        "--domain-name",
        "api.example.com",
        "--certificate-arn",
        "arn:aws:acm:eu-west-1:1:certificate/x",
        "--zone-name",
        "example.com",
    ]);
    assert!(full.is_ok());
}

#[test]
fn test_index_command_with_flag() {
    let cli = Cli::try_parse_from([
        "apigw-compose",
        "index",
        "--spec",
        "openapi.yaml",
        "--reject-duplicates",
    ])
    .unwrap();

    match cli.command {
        Commands::Index {
            spec,
            reject_duplicates,
        } => {
            assert_eq!(spec.to_string_lossy(), "openapi.yaml");
            assert!(reject_duplicates);
        }
        _ => panic!("Expected Index command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["apigw-compose", "compose", "-c", "compose.yaml", "-o", "out.json"],
        vec!["apigw-compose", "index", "--spec", "openapi.yaml"],
        vec!["apigw-compose", "check", "--spec", "openapi.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}
