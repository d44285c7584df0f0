use clap::{Arg, Command};

pub const ARG_API_BASE: &str = "api-base";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE)
                .long("api-base")
                .help("Backend API base URL, e.g. http://127.0.0.1:8000/api")
                .env("GARAGEDESK_API_BASE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding the session token files")
                .long_help(
                    "Directory holding the session token files. Defaults to $XDG_STATE_HOME/garagedesk or ~/.local/state/garagedesk.",
                )
                .env("GARAGEDESK_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Per-request timeout in seconds")
                .env("GARAGEDESK_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
}
