use chrono::NaiveDate;
use sqlx::{Executor, QueryBuilder};

use super::{DataBase, QueryResult};
use crate::{
    error::Error,
    helpers::{formatter, Formatter},
    model::{Stock_Mover, Table},
};

impl Table<Stock_Mover> {
    /// Renders the table template (`$0` is the table name) and runs it.
    pub async fn create_table(
        &self,
        template: &str,
    ) -> Result<QueryResult, sqlx::Error> {
        let sql = formatter(
            template.to_owned(),
            &[Formatter::Str(self.name.to_owned())],
        );
        sqlx::query(&sql).execute(&self.pool).await
    }

    pub async fn has_primary_key(&self) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM `information_schema`.`TABLE_CONSTRAINTS`
            WHERE `TABLE_SCHEMA` = DATABASE()
              AND `TABLE_NAME` = ?
              AND `CONSTRAINT_TYPE` = 'PRIMARY KEY'
            "#,
        )
        .bind(&self.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn add_primary_key(&self) -> Result<QueryResult, sqlx::Error> {
        let sql = format!(
            "ALTER TABLE `{}` ADD PRIMARY KEY (`name`, `date_added`)",
            self.name
        );
        sqlx::query(&sql).execute(&self.pool).await
    }

    /// Appends `data` with a single multi-row statement and returns the
    /// number of rows written.
    pub async fn insert_many<'c, E>(
        &self,
        executor: E,
        data: &[Stock_Mover],
    ) -> Result<u64, Error>
    where
        E: Executor<'c, Database = DataBase>,
    {
        if data.is_empty() {
            return Ok(0);
        }

        let mut query_builder: QueryBuilder<DataBase> =
            QueryBuilder::new(format!(
                r#"
                INSERT INTO `{}` (
                    `name`,
                    `last_price`,
                    `price_change`,
                    `percent_change`,
                    `volume`,
                    `date_added`
                )"#,
                self.name
            ));

        query_builder.push_values(data, |mut b, mover| {
            b.push_bind(&mover.name)
                .push_bind(&mover.last_price)
                .push_bind(&mover.price_change)
                .push_bind(&mover.percent_change)
                .push_bind(&mover.volume)
                .push_bind(mover.date_added);
        });

        let result = query_builder
            .build()
            .execute(executor)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    Error::DuplicateEntry(format!(
                        "{}: {}",
                        self.name,
                        db.message()
                    ))
                },
                e => Error::SQL(e),
            })?;

        Ok(result.rows_affected())
    }

    pub async fn get_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Stock_Mover>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT `name`, `last_price`, `price_change`, `percent_change`, `volume`, `date_added`
            FROM `{}`
            WHERE `date_added` = ?
            ORDER BY `name`
            "#,
            self.name
        );
        sqlx::query_as(&sql).bind(date).fetch_all(&self.pool).await
    }

    pub async fn count_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!(
            "SELECT COUNT(*) FROM `{}` WHERE `date_added` = ?",
            self.name
        );
        sqlx::query_scalar(&sql).bind(date).fetch_one(&self.pool).await
    }
}
