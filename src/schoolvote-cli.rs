//! A small operator tool for the e-voting admin console: check what an
//! account may do, and follow an election's countdown from a terminal.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use serde::de::DeserializeOwned;

use schoolvote_console::model::access::{has_permission, User};
use schoolvote_console::model::election::ElectionRecord;
use schoolvote_console::monitor::{ElectionMonitor, FileRecordSource};
use schoolvote_console::{Config, Error};

const PROGRAM_NAME: &str = "schoolvote-cli";

const ABOUT_TEXT: &str = "Inspect accounts and elections of the school e-voting console.

EXIT CODES:
     0: The check passed or the command completed.
   255: Ran successfully, but the permission check was denied.
 Other: Error.";

const USER_PATH: &str = "USER_PATH";
const RESOURCE: &str = "RESOURCE";
const ACTION: &str = "ACTION";
const ELECTION_PATH: &str = "ELECTION_PATH";
const NOW: &str = "now";
const CONFIG_PATH: &str = "config";
const TICKS: &str = "ticks";

const USER_PATH_HELP: &str = "The path to a JSON dump of the account,\n\
as returned by `GET /users/current`";

const ELECTION_PATH_HELP: &str = "The path to a JSON dump of the election,\n\
as returned by `GET /election`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about("Check whether an account may perform an action on a resource")
                .arg(
                    Arg::new(USER_PATH)
                        .help(USER_PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(RESOURCE)
                        .help("The resource to check, e.g. `voters`")
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(ACTION)
                        .help("The action to check, e.g. `edit`")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Report where an election stands in its lifecycle")
                .arg(
                    Arg::new(ELECTION_PATH)
                        .help(ELECTION_PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(NOW)
                        .long(NOW)
                        .help("Evaluate at this RFC 3339 instant instead of the current one")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Follow an election's countdown, re-reading the record as it changes")
                .arg(
                    Arg::new(ELECTION_PATH)
                        .help(ELECTION_PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(CONFIG_PATH)
                        .long(CONFIG_PATH)
                        .help("The path to a JSON config overriding the tick and refresh intervals")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(TICKS)
                        .long(TICKS)
                        .help("Stop after this many status updates")
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
}

/// Dispatch the chosen subcommand, report the outcome, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let result = match args.subcommand() {
        Some(("check", sub_args)) => check(sub_args),
        Some(("status", sub_args)) => status(sub_args),
        Some(("watch", sub_args)) => watch(sub_args),
        _ => unreachable!("a subcommand is required"),
    };
    match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            println!("Error: {err}");
            1
        }
    }
}

/// Resolve a permission check against a dumped account.
fn check(args: &ArgMatches) -> Result<u8, Error> {
    let path: &String = args.get_one(USER_PATH).unwrap(); // Required argument is guaranteed to be present.
    let resource: &String = args.get_one(RESOURCE).unwrap();
    let action: &String = args.get_one(ACTION).unwrap();

    let user: User = load_json(path)?;
    if has_permission(Some(&user), resource, action) {
        println!("Allowed: {} may {} {}.", user.role, action, resource);
        Ok(0)
    } else {
        println!("Denied: {} may not {} {}.", user.role, action, resource);
        Ok(255)
    }
}

/// Report a dumped election's lifecycle stage and countdown.
fn status(args: &ArgMatches) -> Result<u8, Error> {
    let path: &String = args.get_one(ELECTION_PATH).unwrap();

    let record: ElectionRecord = load_json(path)?;
    let now = match args.get_one::<String>(NOW) {
        Some(instant) => DateTime::parse_from_rfc3339(instant)
            .map_err(|source| Error::InvalidField {
                field: "now",
                value: instant.clone(),
                source,
            })?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let report = record.status_at(now)?;
    println!("Stage: {}", report.stage);
    println!("{}", report.display);
    Ok(0)
}

/// Follow a dumped election until interrupted or the tick limit is reached.
fn watch(args: &ArgMatches) -> Result<u8, Error> {
    let path: &String = args.get_one(ELECTION_PATH).unwrap();
    let config = match args.get_one::<String>(CONFIG_PATH) {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };
    let mut remaining = args.get_one::<u64>(TICKS).copied();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to start tokio runtime");
    runtime.block_on(async move {
        let monitor = ElectionMonitor::start(Arc::new(FileRecordSource::new(path)), &config);
        let mut updates = monitor.subscribe();
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let report = updates.borrow().clone();
                    match report {
                        Some(report) => println!("[{}] {}", report.stage, report.display),
                        None => println!("Loading..."),
                    }
                    if let Some(count) = remaining.as_mut() {
                        *count -= 1;
                        if *count == 0 {
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        monitor.stop().await;
    });
    Ok(0)
}

/// Load a JSON dump from the given path.
fn load_json<T: DeserializeOwned>(path: &str) -> Result<T, Error> {
    let file = BufReader::new(File::open(path).map_err(|source| Error::Io {
        path: path.to_string(),
        source,
    })?);
    Ok(serde_json::from_reader(file)?)
}

fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", log4rs::config::Deserializers::default())
        .expect("Failed to initialise logging");
    info!("Initialised logging");

    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_checks() {
        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_admin.json",
            "roles",
            "delete",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_editor.json",
            "voters",
            "edit",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        // The editor's role is structured, so the singular form matches too.
        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_editor.json",
            "voter",
            "edit",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_editor.json",
            "candidates",
            "edit",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 255);

        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_viewer.json",
            "houses",
            "view",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/user_viewer.json",
            "houses",
            "edit",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 255);

        let command_line = [PROGRAM_NAME, "check", "not a real file", "voters", "view"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);

        let command_line = [
            PROGRAM_NAME,
            "check",
            "example_data/election_malformed.json",
            "voters",
            "view",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn election_status() {
        let command_line = [
            PROGRAM_NAME,
            "status",
            "example_data/election_active.json",
            "--now",
            "2099-05-15T15:59:59Z",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "status",
            "example_data/election_active.json",
            "--now",
            "2099-05-15T16:00:01Z",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "status",
            "example_data/election_malformed.json",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);

        let command_line = [
            PROGRAM_NAME,
            "status",
            "example_data/election_active.json",
            "--now",
            "noon",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn finite_watch() {
        let command_line = [
            PROGRAM_NAME,
            "watch",
            "example_data/election_active.json",
            "--config",
            "example_data/config_fast.json",
            "--ticks",
            "3",
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No subcommand at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Not enough arguments.
        let command_line = [PROGRAM_NAME, "check", "example_data/user_admin.json"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // A tick limit that could never stop the loop.
        let command_line = [
            PROGRAM_NAME,
            "watch",
            "example_data/election_active.json",
            "--ticks",
            "0",
        ];
        cli().try_get_matches_from(command_line).unwrap_err();

        let command_line = [
            PROGRAM_NAME,
            "watch",
            "example_data/election_active.json",
            "--ticks",
            "soon",
        ];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
