use log::info;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, IndexModel};
use std::error::Error;

use crate::user::model::User;

pub struct Database {
    pub client: Client,
}

impl Database {
    pub async fn init(mongodb_uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(mongodb_uri).await?;
        client_options.app_name = Some("blog_graphql_api".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client
            .database("admin")
            .run_command(doc! {"ping": 1})
            .await?;

        info!("Connected successfully to MongoDB");

        Ok(Self { client })
    }

    /// Backs the registration-time email check with a unique index.
    pub async fn ensure_indexes(&self, database: &str) -> Result<(), Box<dyn Error>> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.client
            .database(database)
            .collection::<User>("users")
            .create_index(index)
            .await?;

        Ok(())
    }
}

pub async fn connect_to_mongo(mongodb_uri: &str, database: &str) -> Result<Client, Box<dyn Error>> {
    let database_handle = Database::init(mongodb_uri).await.map_err(|e| {
        log::error!("Failed to initialize database: {:?}", e);
        e
    })?;
    database_handle.ensure_indexes(database).await?;
    Ok(database_handle.client)
}
