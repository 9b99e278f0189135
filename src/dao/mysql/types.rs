use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions, MySqlQueryResult},
    MySql,
};

pub type PoolType = MySqlPool;
pub type PoolOption = MySqlPoolOptions;
pub type QueryResult = MySqlQueryResult;
pub type DataBase = MySql;
