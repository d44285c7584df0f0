use crate::{
    cli::actions::{Console, print_json},
    config::AppConfig,
    envelope::{ApiError, RecordId},
    features::{
        customers::{self, NewCustomer},
        garages::{self, NewGarage},
        reminders,
        services::{self, NewServiceRecord},
        users::{self, NewUser},
        vehicles::{self, NewVehicle, VehicleUpdate},
    },
    transport::HttpClient,
};
use anyhow::Result;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug)]
pub enum Command {
    VehicleList,
    VehicleShow(RecordId),
    VehicleCreate(NewVehicle),
    VehicleUpdate(RecordId, VehicleUpdate),
    VehicleDelete(RecordId),
    CustomerList,
    CustomerCreate(NewCustomer),
    CustomerName(RecordId),
    ServiceList,
    ServiceCreate(NewServiceRecord),
    GarageCreate(NewGarage),
    GarageOwner(RecordId),
    UserList,
    UserCreate(NewUser),
    Reminders,
}

impl Command {
    /// Console screen the command stands for; the route guard runs on it.
    #[must_use]
    pub fn screen(&self) -> String {
        match self {
            Self::VehicleList | Self::VehicleDelete(_) => "/vehicles".to_string(),
            Self::VehicleShow(id) => format!("/vehicles/{id}"),
            Self::VehicleCreate(_) => "/vehicles/create".to_string(),
            Self::VehicleUpdate(id, _) => format!("/vehicles/{id}/edit"),
            Self::CustomerList | Self::CustomerName(_) => "/customers".to_string(),
            Self::CustomerCreate(_) => "/customer-create".to_string(),
            Self::ServiceList => "/services".to_string(),
            Self::ServiceCreate(_) => "/services/create".to_string(),
            Self::GarageCreate(_) | Self::GarageOwner(_) => "/garage-create".to_string(),
            Self::UserList => "/user-details".to_string(),
            Self::UserCreate(_) => "/user-create".to_string(),
            Self::Reminders => "/reminders".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// # Errors
/// Returns an error if the screen is not available to the session or the API
/// call fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(args.config)?;
    console.load_profile().await;
    console.require(&args.command.screen())?;

    let output = run(console.auth.http(), args.command)
        .await
        .map_err(|err| console.failure(err))?;
    print_json(&output)
}

fn render<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

fn message(message: String) -> Value {
    json!({ "message": message })
}

async fn run(http: &HttpClient, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::VehicleList => render(&vehicles::client::list(http).await?),
        Command::VehicleShow(id) => render(&vehicles::client::get(http, &id).await?),
        Command::VehicleCreate(vehicle) => {
            vehicles::client::create(http, vehicle).await.map(message)
        }
        Command::VehicleUpdate(id, update) => vehicles::client::update(http, &id, update)
            .await
            .map(message),
        Command::VehicleDelete(id) => vehicles::client::delete(http, &id).await.map(message),
        Command::CustomerList => render(&customers::list(http).await?),
        Command::CustomerCreate(customer) => customers::create(http, customer).await.map(message),
        Command::CustomerName(id) => {
            let name = customers::name(http, &id).await?;
            Ok(json!({ "id": id, "name": name }))
        }
        Command::ServiceList => render(&services::list(http).await?),
        Command::ServiceCreate(record) => services::create(http, record).await.map(message),
        Command::GarageCreate(garage) => garages::create(http, garage).await.map(message),
        Command::GarageOwner(id) => {
            let username = garages::owner_name(http, &id).await?;
            Ok(json!({ "id": id, "username": username }))
        }
        Command::UserList => render(&users::list(http).await?),
        Command::UserCreate(user) => users::create(http, user).await.map(message),
        Command::Reminders => render(&reminders::list(http).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screens_match_route_table() {
        let id = RecordId::Number(3);
        assert_eq!(Command::VehicleShow(id.clone()).screen(), "/vehicles/3");
        assert_eq!(
            Command::VehicleUpdate(id, VehicleUpdate::default()).screen(),
            "/vehicles/3/edit"
        );
        assert_eq!(Command::UserList.screen(), "/user-details");
        for command in [
            Command::VehicleList,
            Command::CustomerList,
            Command::ServiceList,
            Command::UserList,
            Command::Reminders,
        ] {
            assert!(crate::routes::resolve(&command.screen()).is_some());
        }
    }
}
