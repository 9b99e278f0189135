use std::time::Duration;

use tracing::{error, info, warn};

use crate::{
    configuration::Config,
    dao::{get_path, PoolOption, PoolType},
    error::Error,
    model::{Category, Load_Summary, Mover_Set, Stock_Mover, Table},
};

const TABLE_TEMPLATE: &str = "stock_movers.sql";

#[derive(Debug)]
pub struct DatabasePool {
    pub gainers: Table<Stock_Mover>,
    pub decliners: Table<Stock_Mover>,
    pub most_active: Table<Stock_Mover>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let db = &config.database;
        let pool = match PoolOption::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(config.database_options())
            .await
        {
            Ok(pool) => {
                info!(
                    "Connection to {} for user {} created successfully.",
                    db.host, db.user
                );
                pool
            },
            Err(e) => {
                error!(
                    "Connection could not be made due to the following error: {}",
                    e
                );
                return Err(Error::SQL(e));
            },
        };

        Ok(DatabasePool::from_pool(pool, config))
    }

    pub fn from_pool(pool: PoolType, config: &Config) -> DatabasePool {
        let tables = &config.tables;
        DatabasePool {
            gainers: Table::new(pool.clone(), tables.get(Category::Gainers)),
            decliners: Table::new(
                pool.clone(),
                tables.get(Category::Decliners),
            ),
            most_active: Table::new(
                pool.clone(),
                tables.get(Category::MostActive),
            ),
            pool,
        }
    }

    pub fn table(&self, category: Category) -> &Table<Stock_Mover> {
        match category {
            Category::Gainers => &self.gainers,
            Category::Decliners => &self.decliners,
            Category::MostActive => &self.most_active,
        }
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }

    /// Creates the movers tables and makes sure each carries the
    /// `(name, date_added)` primary key. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<(), Error> {
        let dir = env!("CARGO_MANIFEST_DIR");
        let template = get_path(dir, TABLE_TEMPLATE)?;

        for category in Category::ALL {
            let table = self.table(category);
            table.create_table(&template).await?;

            if table.has_primary_key().await? {
                continue;
            }

            warn!(
                "Table {} has no primary key, adding (name, date_added)",
                table.name
            );
            if let Err(e) = table.add_primary_key().await {
                error!(
                    "Primary key could not be created on {} due to the following error: {}",
                    table.name, e
                );
                return Err(Error::SQL(e));
            }
        }

        Ok(())
    }

    /// Appends the three collections in one transaction. Either every
    /// table receives its rows or none does.
    pub async fn load(&self, data: &Mover_Set) -> Result<Load_Summary, Error> {
        let mut tx = self.pool.begin().await?;
        let mut summary = Load_Summary::default();

        for category in Category::ALL {
            let table = self.table(category);
            match table.insert_many(&mut *tx, data.get(category)).await {
                Ok(rows) => {
                    info!("Inserted {} rows into {}", rows, table.name);
                    summary.inserted.push((category, rows));
                },
                Err(e) => {
                    error!(
                        "Table {} could not be loaded due to the following error: {}",
                        table.name, e
                    );
                    tx.rollback().await?;
                    return Err(e);
                },
            }
        }

        tx.commit().await?;

        Ok(summary)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::lookup_from_pairs;
    use chrono::NaiveDate;

    async fn test_database(prefix: &str) -> Option<DatabasePool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PoolOption::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();

        let gainers = format!("{}_gainers", prefix);
        let decliners = format!("{}_decliners", prefix);
        let most_active = format!("{}_most_active", prefix);
        let config = Config::from_lookup(lookup_from_pairs(&[
            ("DB_HOST", "unused"),
            ("DB_USER", "unused"),
            ("DB_NAME", "unused"),
            ("TABLE_GAINERS", gainers.as_str()),
            ("TABLE_DECLINERS", decliners.as_str()),
            ("TABLE_MOST_ACTIVE", most_active.as_str()),
        ]))
        .unwrap();

        let database = DatabasePool::from_pool(pool, &config);
        for category in Category::ALL {
            let sql = format!(
                "DROP TABLE IF EXISTS `{}`",
                database.table(category).name
            );
            sqlx::query(&sql)
                .execute(database.get_pool())
                .await
                .unwrap();
        }

        Some(database)
    }

    fn mover(name: &str, price: &str, date: NaiveDate) -> Stock_Mover {
        Stock_Mover {
            name: name.to_owned(),
            last_price: Some(price.to_owned()),
            price_change: Some(String::from("+2.00")),
            percent_change: Some(String::from("+1.35%")),
            volume: Some(String::from("1.2M")),
            date_added: date,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a MySQL database"]
    async fn test_load_and_read_back() {
        let Some(database) = test_database("it_roundtrip").await else {
            return;
        };
        database.init_schema().await.unwrap();
        database.init_schema().await.unwrap();

        let data = Mover_Set {
            gainers: vec![
                mover("MSFT", "410.20", date()),
                mover("AAPL", "150.00", date()),
            ],
            decliners: vec![mover("TSLA", "180.00", date())],
            most_active: vec![],
        };

        let summary = database.load(&data).await.unwrap();
        assert_eq!(
            summary.inserted,
            vec![
                (Category::Decliners, 1),
                (Category::Gainers, 2),
                (Category::MostActive, 0),
            ]
        );

        let gainers = database.gainers.get_by_date(date()).await.unwrap();
        assert_eq!(
            gainers,
            vec![
                mover("AAPL", "150.00", date()),
                mover("MSFT", "410.20", date()),
            ]
        );
        assert_eq!(database.decliners.count_by_date(date()).await.unwrap(), 1);
        assert_eq!(database.most_active.count_by_date(date()).await.unwrap(), 0);

        database.close().await;
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a MySQL database"]
    async fn test_duplicate_load_rolls_back() {
        let Some(database) = test_database("it_duplicate").await else {
            return;
        };
        database.init_schema().await.unwrap();

        let first = Mover_Set {
            gainers: vec![mover("AAPL", "150.00", date())],
            ..Default::default()
        };
        database.load(&first).await.unwrap();

        let second = Mover_Set {
            decliners: vec![mover("TSLA", "180.00", date())],
            gainers: vec![mover("AAPL", "151.00", date())],
            ..Default::default()
        };
        let result = database.load(&second).await;

        assert!(matches!(result, Err(Error::DuplicateEntry(_))));
        assert_eq!(database.decliners.count_by_date(date()).await.unwrap(), 0);
        assert_eq!(
            database.gainers.get_by_date(date()).await.unwrap(),
            vec![mover("AAPL", "150.00", date())]
        );

        database.close().await;
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a MySQL database"]
    async fn test_primary_key_added_to_existing_table() {
        let Some(database) = test_database("it_legacy").await else {
            return;
        };
        let sql = format!(
            "CREATE TABLE `{}` (`name` VARCHAR(500), `last_price` TEXT, `price_change` TEXT, `percent_change` TEXT, `volume` TEXT, `date_added` DATE)",
            database.gainers.name
        );
        sqlx::query(&sql)
            .execute(database.get_pool())
            .await
            .unwrap();
        assert!(!database.gainers.has_primary_key().await.unwrap());

        database.init_schema().await.unwrap();

        for category in Category::ALL {
            assert!(database.table(category).has_primary_key().await.unwrap());
        }

        database.close().await;
    }
}
