use std::{collections::HashMap, env, fmt, path::Path};

use sqlx::mysql::MySqlConnectOptions;
use url::Url;

use crate::{error::Error, helpers::is_identifier, model::Category};

pub const DEFAULT_MOVERS_URL: &str = "https://www.wsj.com/market-data/stocks/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0";

#[derive(Debug, Clone)]
pub struct Config {
    pub movers_url: Url,
    pub movers_count: u16,
    pub movers_region: String,
    pub user_agent: String,
    pub timeout: u64,
    pub database: DatabaseConfig,
    pub tables: TableNames,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TableNames {
    pub gainers: String,
    pub decliners: String,
    pub most_active: String,
}

impl TableNames {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Gainers => &self.gainers,
            Category::Decliners => &self.decliners,
            Category::MostActive => &self.most_active,
        }
    }
}

impl Config {
    /// Builds the configuration from a key lookup. Optional keys fall back
    /// to the defaults of the upstream endpoint.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_owned())
        };
        let required = |key: &str| -> Result<String, Error> {
            lookup(key).ok_or_else(|| {
                Error::ConfigurationError(format!("{} is not set", key))
            })
        };

        let movers_url = Url::parse(&optional("MOVERS_URL", DEFAULT_MOVERS_URL))?;
        let movers_count: u16 = optional("MOVERS_COUNT", "100").parse()?;
        let movers_region = optional("MOVERS_REGION", "US");
        let user_agent = optional("USER_AGENT", DEFAULT_USER_AGENT);
        let timeout: u64 = optional("TIMEOUT", "30").parse()?;

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: optional("DB_PORT", "3306").parse()?,
            user: required("DB_USER")?,
            password: optional("DB_PASSWORD", ""),
            database: required("DB_NAME")?,
        };

        let tables = TableNames {
            gainers: table_name(
                optional("TABLE_GAINERS", Category::Gainers.default_table()),
            )?,
            decliners: table_name(optional(
                "TABLE_DECLINERS",
                Category::Decliners.default_table(),
            ))?,
            most_active: table_name(optional(
                "TABLE_MOST_ACTIVE",
                Category::MostActive.default_table(),
            ))?,
        };

        Ok(Config {
            movers_url,
            movers_count,
            movers_region,
            user_agent,
            timeout,
            database,
            tables,
        })
    }

    pub fn database_options(&self) -> MySqlConnectOptions {
        let db = &self.database;
        MySqlConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.database)
    }
}

fn table_name(value: String) -> Result<String, Error> {
    if is_identifier(&value) {
        Ok(value)
    } else {
        Err(Error::ConfigurationError(format!(
            "Invalid table name: {}",
            value
        )))
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    Config::from_lookup(|key| env::var(key).ok())
}

/// Loads `.env` and `movers.conf` from the crate directory into the
/// process environment. Variables already set win, absent files are skipped.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";
    let movers_config_file: &str = "movers.conf";

    let directory = env!("CARGO_MANIFEST_DIR");

    for file in [config_file, movers_config_file] {
        load_env_file(&Path::new(directory).join(file))?;
    }

    Ok(())
}

fn load_env_file(path: &Path) -> Result<(), Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::DotEnvError(e)),
    }
}

/// Lookup over a fixed set of pairs, used where the process environment
/// must stay untouched.
pub fn lookup_from_pairs(
    pairs: &[(&str, &str)],
) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}
