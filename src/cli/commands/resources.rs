use clap::{Arg, Command};

fn id(help: &'static str) -> Arg {
    Arg::new("id").help(help).required(true)
}

fn vehicle_fields(command: Command, required: bool) -> Command {
    command
        .arg(
            Arg::new("number")
                .long("number")
                .help("Registration number, e.g. MH05DU6253")
                .required(required),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .help("Vehicle type id")
                .required(required)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .help("Vehicle model")
                .required(required),
        )
        .arg(Arg::new("description").long("description").help("Free-form description"))
}

fn vehicles() -> Command {
    Command::new("vehicles")
        .about("Vehicle screens")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List vehicles"))
        .subcommand(Command::new("show").about("Show one vehicle").arg(id("Vehicle id")))
        .subcommand(vehicle_fields(
            Command::new("create").about("Register a vehicle").arg(
                Arg::new("customer")
                    .long("customer")
                    .help("Owning customer id")
                    .value_parser(clap::value_parser!(i64)),
            ),
            true,
        ))
        .subcommand(vehicle_fields(
            Command::new("update")
                .about("Edit a vehicle; only the given fields change")
                .arg(id("Vehicle id")),
            false,
        ))
        .subcommand(Command::new("delete").about("Delete a vehicle").arg(id("Vehicle id")))
}

fn customers() -> Command {
    Command::new("customers")
        .about("Customer screens")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List garage customers"))
        .subcommand(
            Command::new("create")
                .about("Add a customer")
                .arg(Arg::new("name").long("name").help("Customer name").required(true))
                .arg(
                    Arg::new("mobile")
                        .long("mobile")
                        .help("10 digit mobile number")
                        .required(true),
                )
                .arg(Arg::new("address").long("address").help("Postal address")),
        )
        .subcommand(
            Command::new("name")
                .about("Look up a customer name")
                .arg(id("Customer id")),
        )
}

fn services() -> Command {
    Command::new("services")
        .about("Service record screens")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List service records"))
        .subcommand(
            Command::new("create")
                .about("Record a service")
                .arg(
                    Arg::new("vehicle")
                        .long("vehicle")
                        .help("Vehicle id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("customer")
                        .long("customer")
                        .help("Customer id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Service date, YYYY-MM-DD")
                        .required(true),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .help("Months until the next service")
                        .default_value("6")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(Arg::new("notes").long("notes").help("Work notes")),
        )
}

fn garages() -> Command {
    Command::new("garages")
        .about("Garage onboarding")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Create a garage for an owner account")
                .arg(Arg::new("name").long("name").help("Garage name").required(true))
                .arg(
                    Arg::new("mobile")
                        .long("mobile")
                        .help("10 digit mobile number")
                        .required(true),
                )
                .arg(Arg::new("address").long("address").help("Postal address"))
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .help("Owner user id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("whatsapp")
                        .long("whatsapp")
                        .help("10 digit WhatsApp number"),
                ),
        )
        .subcommand(
            Command::new("owner")
                .about("Look up an owner's username")
                .arg(id("User id")),
        )
}

fn users() -> Command {
    Command::new("users")
        .about("Operator accounts")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List accounts"))
        .subcommand(
            Command::new("create")
                .about("Create an account")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help("Account username")
                        .required(true),
                )
                .arg(Arg::new("email").long("email").help("Email address"))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Initial password")
                        .required(true),
                )
                .arg(
                    Arg::new("role")
                        .long("role")
                        .help("Account role")
                        .default_value("USER")
                        .value_parser(["SUPER_ADMIN", "ADMIN", "USER"]),
                ),
        )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .subcommand(vehicles())
        .subcommand(customers())
        .subcommand(services())
        .subcommand(garages())
        .subcommand(users())
        .subcommand(Command::new("reminders").about("List pending service reminders"))
}
