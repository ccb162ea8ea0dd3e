use mongodb::Database;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// MongoDB container owned by one test; removed on drop.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let users = mongo.database().collection::<mongodb::bson::Document>("users");
/// # }
/// ```
pub struct TestMongo {
    _container: ContainerAsync<Mongo>,
    database: Database,
}

impl TestMongo {
    /// Start a MongoDB 7 container with a fresh `test` database.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let client = mongodb::Client::with_uri_str(format!("mongodb://127.0.0.1:{host_port}"))
            .await
            .expect("Failed to create MongoDB client");

        let database = client.database("test");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            _container: container,
            database,
        }
    }

    /// Handle to the `test` database (cheap to clone)
    pub fn database(&self) -> Database {
        self.database.clone()
    }
}
