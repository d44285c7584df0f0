pub mod api;
pub mod logging;
mod resources;
mod session;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("garagedesk")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = api::with_args(command);
    let command = logging::with_args(command);
    let command = session::with_args(command);
    resources::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "garagedesk");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let matches = new().get_matches_from(vec![
            "garagedesk",
            "vehicles",
            "list",
            "--api-base",
            "https://garage.example/api",
            "--timeout",
            "30",
        ]);

        assert_eq!(
            matches.get_one::<String>(api::ARG_API_BASE).cloned(),
            Some("https://garage.example/api".to_string())
        );
        assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT).copied(), Some(30));
        assert_eq!(matches.subcommand_name(), Some("vehicles"));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("GARAGEDESK_API_BASE", Some("https://garage.example/api")),
                ("GARAGEDESK_STATE_DIR", Some("/tmp/garagedesk")),
                ("GARAGEDESK_TIMEOUT", Some("15")),
                ("GARAGEDESK_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["garagedesk", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_BASE).cloned(),
                    Some("https://garage.example/api".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(api::ARG_STATE_DIR).cloned(),
                    Some("/tmp/garagedesk".to_string())
                );
                assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT).copied(), Some(15));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("GARAGEDESK_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["garagedesk".to_string(), "nav".to_string()];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_login_requires_username() {
        let result = new().try_get_matches_from(vec!["garagedesk", "login"]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::MissingRequiredArgument)
        );
    }

    #[test]
    fn test_rejects_unknown_role_and_bad_timeout() {
        let result = new().try_get_matches_from(vec![
            "garagedesk",
            "users",
            "create",
            "--username",
            "op",
            "--password",
            "pw",
            "--role",
            "admin",
        ]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::InvalidValue)
        );

        let result = new().try_get_matches_from(vec!["garagedesk", "--timeout", "0", "nav"]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::ValueValidation)
        );
    }
}
