use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{trip::Trip, user::User};

pub const DATABASE: &str = "Planora";
pub const USERS: &str = "Users";
pub const TRIPS: &str = "Trips";

pub async fn create_mongo_client(uri: &str) -> mongodb::error::Result<Arc<Client>> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Set the server API if using MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database(DATABASE)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Successfully connected to MongoDB"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("Trip planning still works, accounts and trip history may not");
        }
    }

    Ok(Arc::new(client))
}

/// Unique e-mail index backing the duplicate-account check.
pub async fn ensure_indexes(client: &Client) -> mongodb::error::Result<()> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    users(client).create_index(index).await?;
    Ok(())
}

pub fn users(client: &Client) -> Collection<User> {
    client.database(DATABASE).collection(USERS)
}

pub fn trips(client: &Client) -> Collection<Trip> {
    client.database(DATABASE).collection(TRIPS)
}
