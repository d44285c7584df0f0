use clap::{Arg, ArgAction, Command};

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .subcommand(
            Command::new("login")
                .about("Log in and store the session tokens")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Account username")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Account password; prompted on stdin when omitted")
                        .env("GARAGEDESK_PASSWORD")
                        .hide_env_values(true),
                )
                .arg(
                    Arg::new("next")
                        .long("next")
                        .help("Screen to open after login (default: /dashboard)"),
                ),
        )
        .subcommand(
            Command::new("logout")
                .about("Forget the stored session")
                .arg(
                    Arg::new("remote")
                        .long("remote")
                        .help("Also ask the backend to end the session")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("whoami").about("Show the logged-in operator"))
        .subcommand(
            Command::new("open")
                .about("Check whether a screen may be opened")
                .arg(Arg::new("path").help("Screen path, e.g. /vehicles/3/edit").required(true)),
        )
        .subcommand(Command::new("nav").about("List the screens available to the operator"))
}
