use std::path::PathBuf;

use catalogdb_core::AppConfig;

use super::*;
use crate::run::{run_normalize, RunArgs, RunPlan};

fn make_config() -> AppConfig {
    AppConfig {
        pg_host: "localhost".to_string(),
        pg_port: 5432,
        pg_database: None,
        pg_user: None,
        pg_password: None,
        db_max_connections: 5,
        db_acquire_timeout_secs: 10,
        sheets_credentials_path: None,
        sheets_token_path: PathBuf::from("token.json"),
        http_timeout_secs: 30,
        chunk_size: 1000,
        max_deliverables: Some(1),
        output_dir: PathBuf::from("."),
        log_level: "info".to_string(),
    }
}

fn parse_run(args: &[&str]) -> RunArgs {
    let argv = ["catalogdb", "run"].iter().chain(args.iter()).copied();
    match Cli::try_parse_from(argv).expect("expected valid cli args").command {
        Commands::Run(run) => run,
        other => panic!("expected run command, got {other:?}"),
    }
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["catalogdb", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Ping
        }
    ));
}

#[test]
fn parses_db_init_command() {
    let cli = Cli::try_parse_from(["catalogdb", "db", "init"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Init
        }
    ));
}

#[test]
fn parses_sheets_auth_command() {
    let cli =
        Cli::try_parse_from(["catalogdb", "sheets", "auth"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Sheets {
            command: SheetsCommands::Auth
        }
    ));
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["catalogdb"]).is_err());
}

#[test]
fn run_requires_input() {
    assert!(Cli::try_parse_from(["catalogdb", "run"]).is_err());
}

#[test]
fn run_defaults_leave_overrides_unset() {
    let args = parse_run(&["--input", "raw.csv"]);

    assert_eq!(args.input, PathBuf::from("raw.csv"));
    assert!(args.chunk_size.is_none());
    assert!(args.max_deliverables.is_none());
    assert!(args.output_dir.is_none());
    assert!(!args.skip_db);
    assert!(!args.skip_sheets);
}

#[test]
fn run_parses_every_flag() {
    let args = parse_run(&[
        "--input",
        "raw.csv",
        "--chunk-size",
        "250",
        "--max-deliverables",
        "3",
        "--output-dir",
        "out",
        "--skip-db",
        "--skip-sheets",
    ]);

    assert_eq!(args.chunk_size, Some(250));
    assert_eq!(args.max_deliverables, Some(3));
    assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    assert!(args.skip_db);
    assert!(args.skip_sheets);
}

#[test]
fn run_rejects_non_numeric_chunk_size() {
    let result = Cli::try_parse_from(["catalogdb", "run", "--input", "a.csv", "--chunk-size", "x"]);
    assert!(result.is_err());
}

#[test]
fn parses_normalize_command() {
    let cli = Cli::try_parse_from([
        "catalogdb",
        "normalize",
        "--input",
        "raw.csv",
        "--output",
        "clean.csv",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Normalize { ref input, ref output }
            if input == &PathBuf::from("raw.csv") && output == &PathBuf::from("clean.csv")
    ));
}

#[test]
fn run_plan_falls_back_to_config() {
    let config = make_config();
    let args = parse_run(&["--input", "raw.csv"]);

    assert_eq!(
        RunPlan::resolve(&config, &args),
        RunPlan {
            chunk_size: 1000,
            max_deliverables: Some(1),
            output_dir: PathBuf::from("."),
        }
    );
}

#[test]
fn run_plan_prefers_flags() {
    let config = make_config();
    let args = parse_run(&[
        "--input",
        "raw.csv",
        "--chunk-size",
        "10",
        "--max-deliverables",
        "4",
        "--output-dir",
        "out",
    ]);

    assert_eq!(
        RunPlan::resolve(&config, &args),
        RunPlan {
            chunk_size: 10,
            max_deliverables: Some(4),
            output_dir: PathBuf::from("out"),
        }
    );
}

#[test]
fn normalize_writes_filtered_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("clean.csv");
    std::fs::write(
        &input,
        "barcode_number,barcode_formats,title,category,size\n\
         012345678905,UPC-A 012345678905,Acme Super Clean Gel 12 oz,Health > Beauty,\n\
         000000000001,EAN-13 1,Acme Amp,Electronics > Audio,\n",
    )
    .expect("write input");

    run_normalize(&input, &output).expect("normalize should succeed");

    let written = std::fs::read_to_string(&output).expect("read output");
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("product_id,upc_ean,brand,product_name,category,subcategory,size")
    );
    assert_eq!(
        lines.next(),
        Some("012345678905,UPC-A 012345678905,Acme Super,Clean Gel,Health > Beauty,,12 oz")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn normalize_reports_missing_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("raw.csv");
    std::fs::write(&input, "barcode_number,category\n1,Beauty\n").expect("write input");

    let err = run_normalize(&input, &dir.path().join("out.csv")).expect_err("should fail");
    let message = format!("{err:#}");
    assert!(message.contains("barcode_formats, title"), "{message}");
}
