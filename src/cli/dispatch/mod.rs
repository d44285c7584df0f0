use crate::{
    cli::{
        actions::{Action, navigate, resources, session},
        commands::api::{ARG_API_BASE, ARG_STATE_DIR, ARG_TIMEOUT},
    },
    config::AppConfig,
    envelope::RecordId,
    features::{
        auth::Role,
        customers::NewCustomer,
        garages::NewGarage,
        services::NewServiceRecord,
        users::NewUser,
        vehicles::{NewVehicle, VehicleUpdate},
    },
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;

fn config(matches: &ArgMatches) -> AppConfig {
    let mut config = AppConfig::load();
    if let Some(base) = matches.get_one::<String>(ARG_API_BASE) {
        config = config.with_api_base_url(base);
    }
    if let Some(dir) = matches.get_one::<String>(ARG_STATE_DIR)
        && !dir.trim().is_empty()
    {
        config = config.with_state_dir(dir.trim());
    }
    if let Some(timeout) = matches.get_one::<u64>(ARG_TIMEOUT) {
        config = config.with_request_timeout_secs(*timeout);
    }
    config
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required_string(matches: &ArgMatches, id: &str) -> Result<String> {
    string(matches, id).with_context(|| format!("missing required argument: --{id}"))
}

fn record_id(matches: &ArgMatches) -> Result<RecordId> {
    let raw = required_string(matches, "id")?;
    Ok(raw.parse::<RecordId>()?)
}

fn required_i64(matches: &ArgMatches, id: &str) -> Result<i64> {
    matches
        .get_one::<i64>(id)
        .copied()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let config = config(matches);

    let (name, sub) = matches
        .subcommand()
        .context("no command given; see `garagedesk --help`")?;

    let action = match name {
        "login" => session_action(
            config,
            session::Command::Login {
                username: required_string(sub, "username")?,
                password: string(sub, "password").map(SecretString::from),
                next: string(sub, "next"),
            },
        ),
        "logout" => session_action(
            config,
            session::Command::Logout {
                remote: sub.get_flag("remote"),
            },
        ),
        "whoami" => session_action(config, session::Command::Whoami),
        "open" => Action::Navigate(navigate::Args {
            config,
            command: navigate::Command::Open {
                path: required_string(sub, "path")?,
            },
        }),
        "nav" => Action::Navigate(navigate::Args {
            config,
            command: navigate::Command::Menu,
        }),
        "vehicles" | "customers" | "services" | "garages" | "users" | "reminders" => {
            Action::Resource(resources::Args {
                config,
                command: resource_command(name, sub)?,
            })
        }
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(action)
}

fn session_action(config: AppConfig, command: session::Command) -> Action {
    Action::Session(session::Args { config, command })
}

fn resource_command(name: &str, matches: &ArgMatches) -> Result<resources::Command> {
    use resources::Command as C;

    if name == "reminders" {
        return Ok(C::Reminders);
    }

    let (op, sub) = matches
        .subcommand()
        .with_context(|| format!("missing {name} subcommand"))?;

    let command = match (name, op) {
        ("vehicles", "list") => C::VehicleList,
        ("vehicles", "show") => C::VehicleShow(record_id(sub)?),
        ("vehicles", "create") => C::VehicleCreate(NewVehicle {
            vehicle_number: required_string(sub, "number")?,
            vehicle_type: required_i64(sub, "type")?,
            vehicle_model: required_string(sub, "model")?,
            vehicle_description: string(sub, "description").unwrap_or_default(),
            customer_id: sub.get_one::<i64>("customer").copied(),
        }),
        ("vehicles", "update") => C::VehicleUpdate(
            record_id(sub)?,
            VehicleUpdate {
                vehicle_number: string(sub, "number"),
                vehicle_type: sub.get_one::<i64>("type").copied(),
                vehicle_model: string(sub, "model"),
                vehicle_description: string(sub, "description"),
            },
        ),
        ("vehicles", "delete") => C::VehicleDelete(record_id(sub)?),
        ("customers", "list") => C::CustomerList,
        ("customers", "create") => C::CustomerCreate(NewCustomer {
            name: required_string(sub, "name")?,
            mobile: required_string(sub, "mobile")?,
            address: string(sub, "address").unwrap_or_default(),
        }),
        ("customers", "name") => C::CustomerName(record_id(sub)?),
        ("services", "list") => C::ServiceList,
        ("services", "create") => C::ServiceCreate(NewServiceRecord {
            vehicle_id: required_i64(sub, "vehicle")?,
            customer_id: required_i64(sub, "customer")?,
            service_date: required_string(sub, "date")?,
            service_interval_months: sub.get_one::<u32>("interval").copied().unwrap_or(6),
            notes: string(sub, "notes").unwrap_or_default(),
        }),
        ("garages", "create") => C::GarageCreate(NewGarage {
            garage_name: required_string(sub, "name")?,
            mobile: required_string(sub, "mobile")?,
            address: string(sub, "address").unwrap_or_default(),
            user_id: required_i64(sub, "owner")?,
            whatsapp_number: string(sub, "whatsapp").unwrap_or_default(),
        }),
        ("garages", "owner") => C::GarageOwner(record_id(sub)?),
        ("users", "list") => C::UserList,
        ("users", "create") => {
            let role = required_string(sub, "role")?;
            C::UserCreate(NewUser {
                username: required_string(sub, "username")?,
                email: string(sub, "email").unwrap_or_default(),
                password: SecretString::from(required_string(sub, "password")?),
                role: Role::from_wire(&role).with_context(|| format!("unknown role: {role}"))?,
            })
        }
        (name, op) => return Err(anyhow!("unknown command: {name} {op}")),
    };

    Ok(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use std::{path::PathBuf, time::Duration};

    fn dispatch(args: &[&str]) -> Action {
        let matches = commands::new().get_matches_from(args.iter().copied());
        handler(&matches).unwrap()
    }

    #[test]
    fn global_flags_build_config() {
        temp_env::with_vars(
            [
                ("GARAGEDESK_API_BASE", None::<&str>),
                ("GARAGEDESK_STATE_DIR", None::<&str>),
                ("GARAGEDESK_TIMEOUT", None::<&str>),
            ],
            || {
                let action = dispatch(&[
                    "garagedesk",
                    "--api-base",
                    "https://garage.example/api/",
                    "--state-dir",
                    "/tmp/gd",
                    "--timeout",
                    "20",
                    "whoami",
                ]);
                let Action::Session(args) = action else {
                    panic!("expected session action");
                };
                assert_eq!(args.config.api_base_url, "https://garage.example/api");
                assert_eq!(args.config.state_dir, PathBuf::from("/tmp/gd"));
                assert_eq!(args.config.request_timeout, Duration::from_secs(20));
                assert!(matches!(args.command, session::Command::Whoami));
            },
        );
    }

    #[test]
    fn login_reads_password_from_env() {
        temp_env::with_vars([("GARAGEDESK_PASSWORD", Some("pw"))], || {
            let action = dispatch(&["garagedesk", "login", "-u", "bob", "--next", "/users"]);
            let Action::Session(session::Args {
                command:
                    session::Command::Login {
                        username,
                        password,
                        next,
                    },
                ..
            }) = action
            else {
                panic!("expected login");
            };
            assert_eq!(username, "bob");
            assert!(password.is_some());
            assert_eq!(next.as_deref(), Some("/users"));
        });
    }

    #[test]
    fn vehicle_update_keeps_only_given_fields() {
        let action = dispatch(&[
            "garagedesk",
            "vehicles",
            "update",
            "7",
            "--model",
            "Baleno",
        ]);
        let Action::Resource(resources::Args {
            command: resources::Command::VehicleUpdate(id, update),
            ..
        }) = action
        else {
            panic!("expected vehicle update");
        };
        assert_eq!(id, RecordId::Number(7));
        assert_eq!(update.vehicle_model.as_deref(), Some("Baleno"));
        assert!(update.vehicle_number.is_none());
    }

    #[test]
    fn users_create_parses_role() {
        let action = dispatch(&[
            "garagedesk",
            "users",
            "create",
            "--username",
            "op",
            "--password",
            "pw",
            "--role",
            "ADMIN",
        ]);
        let Action::Resource(resources::Args {
            command: resources::Command::UserCreate(user),
            ..
        }) = action
        else {
            panic!("expected user create");
        };
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn path_like_ids_are_refused() {
        let matches =
            commands::new().get_matches_from(["garagedesk", "vehicles", "delete", "../users"]);
        let err = handler(&matches).unwrap_err();
        assert!(err.to_string().contains("invalid record id"));
    }

    #[test]
    fn reminders_has_no_subcommand() {
        let action = dispatch(&["garagedesk", "reminders"]);
        assert!(matches!(
            action,
            Action::Resource(resources::Args {
                command: resources::Command::Reminders,
                ..
            })
        ));
    }
}
