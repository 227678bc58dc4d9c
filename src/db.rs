use std::sync::OnceLock;

use bb8_postgres::{PostgresConnectionManager, bb8};
use tokio_postgres::NoTls;

pub type ConnectionManager = PostgresConnectionManager<NoTls>;
pub type Pool = bb8::Pool<ConnectionManager>;
pub type PooledConnection = bb8::PooledConnection<'static, ConnectionManager>;
pub type DBError = tokio_postgres::Error;
pub type BB8Error = bb8::RunError<DBError>;
pub type DBResult<T> = Result<T, DBError>;

static POOL: OnceLock<Pool> = OnceLock::new();

mod constants {
    use core::time::Duration;

    macro_rules! env_or_default {
        ($name:expr, $default:expr) => {
            if let Some(s) = option_env!($name) {
                s
            } else {
                $default
            }
        };
    }

    pub const HOST: &str = env_or_default!("DB_HOST", "/var/run/postgresql");
    pub const USER: &str = env_or_default!("DB_USER", "postgres");
    pub const DBNAME: &str = env_or_default!("DB_NAME", "postgres");
    pub const PASSWORD: Option<&str> = option_env!("DB_PASSWORD");
    pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
}

pub async fn init_db() {
    use constants::{CONNECTION_TIMEOUT, DBNAME, HOST, PASSWORD, USER};

    let mut config = tokio_postgres::Config::new();
    config
        .host_path(HOST)
        .user(USER)
        .dbname(DBNAME)
        .connect_timeout(CONNECTION_TIMEOUT);
    if let Some(password) = PASSWORD {
        config.password(password);
    }

    let manager = PostgresConnectionManager::new(config, NoTls);

    #[allow(clippy::unwrap_used)]
    let pool = Pool::builder()
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
        .await
        .unwrap();

    POOL.set(pool).unwrap();
}

pub fn get_connection() -> impl Future<Output = Result<PooledConnection, BB8Error>> {
    POOL.get().expect("init_db must run first").get()
}

/// One row per source; reconciliation keys on it.
pub async fn init_schema(conn: &tokio_postgres::Client) -> DBResult<()> {
    conn.batch_execute(
        "create schema if not exists webcomic;\
         create table if not exists webcomic.comics (\
             source text primary key,\
             title text not null,\
             url text not null,\
             subtitle text not null\
         )",
    )
    .await
}
