use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_PATH: OnceCell<PathBuf> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: SqlitePool,
    pub db_path: PathBuf,
}

impl TestDb {
    // One database file per test binary, shared by every test in it.
    // Pass file!() so the name identifies the binary that made it.
    pub async fn get_instance(test_file: &str) -> Result<SqlitePool, sqlx::Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        // Reuse the pool once the first test has set it up
        if let Some(db) = guard.as_ref() {
            return Ok(db.pool.clone());
        }

        let db = Self::setup_database(test_file).await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database(test_file: &str) -> Result<Self, sqlx::Error> {
        // Token helpers need a secret before any login runs
        if env::var("JWT_SECRET").is_err() {
            env::set_var("JWT_SECRET", "test_secret_key");
        }

        let db_path = DB_PATH
            .get_or_init(|| {
                let stem = Path::new(test_file)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("test");
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_nanos();
                env::temp_dir().join(format!("airport_api_{}_{}.db", stem, timestamp))
            })
            .clone();

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        // Tests run on separate runtimes, so the pool must not reap
        // idle connections from a background task
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        airport_api::db::run_migrations(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        Ok(Self { pool, db_path })
    }

    // Runs from a #[dtor] after every runtime is gone, so it can only
    // touch the filesystem
    pub fn cleanup_database_sync() -> std::io::Result<()> {
        if let Some(db_path) = DB_PATH.get() {
            for suffix in ["", "-wal", "-shm"] {
                let mut path = db_path.clone().into_os_string();
                path.push(suffix);
                let path = PathBuf::from(path);
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
            }
        }
        Ok(())
    }
}
