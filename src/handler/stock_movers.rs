use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::{
    configuration::Config,
    error::Error,
    model::{Category, Load_Summary, Mover_Set, Stock_Mover},
    provider::{DatabasePool, HTTP},
    types::{MoverInstruments, StockMoversBody},
};

pub fn parse_payload(body: &str) -> Result<StockMoversBody, Error> {
    let payload = serde_json::from_str::<StockMoversBody>(body)?;
    Ok(payload)
}

/// Projects one category of the payload into rows stamped with `date`,
/// keeping the upstream order.
pub fn to_records(
    body: &StockMoversBody,
    category: Category,
    date: NaiveDate,
) -> Result<Vec<Stock_Mover>, Error> {
    let key = category.json_key();
    let value = body
        .data
        .get(key)
        .ok_or_else(|| Error::FieldNotExist(key.to_owned()))?;
    let movers = MoverInstruments::deserialize(value)?;

    let records = movers
        .instruments
        .into_iter()
        .map(|instrument| Stock_Mover {
            name: instrument.formatted_name,
            last_price: instrument.last_price,
            price_change: instrument.price_change,
            percent_change: instrument.percent_change,
            volume: instrument.formatted_volume,
            date_added: date,
        })
        .collect();

    Ok(records)
}

pub fn transform(
    body: &StockMoversBody,
    date: NaiveDate,
) -> Result<Mover_Set, Error> {
    Ok(Mover_Set {
        decliners: to_records(body, Category::Decliners, date)?,
        gainers: to_records(body, Category::Gainers, date)?,
        most_active: to_records(body, Category::MostActive, date)?,
    })
}

/// Fetch and transform stages. Fails before anything touches the database.
pub async fn fetch_transform(
    http: &HTTP,
    date: NaiveDate,
) -> Result<Mover_Set, Error> {
    let response = http.fetch_stock_movers().await?;
    let body = parse_payload(&response.body)?;
    let data = transform(&body, date)?;

    for category in Category::ALL {
        info!("Parsed {} {} records", data.get(category).len(), category);
    }

    Ok(data)
}

/// One full run: fetch, transform, then load into the configured tables.
/// With `dry_run` the database is never contacted.
pub async fn fetch_transform_load(
    config: &Config,
    dry_run: bool,
) -> Result<Option<Load_Summary>, Error> {
    let date = Local::now().date_naive();
    let http = HTTP::new(config.clone())?;
    let data = fetch_transform(&http, date).await?;

    if dry_run {
        info!("Dry run, {} records not loaded", data.len());
        return Ok(None);
    }

    let database = DatabasePool::new(config).await?;
    let result = load(&database, &data).await;
    database.close().await;

    result.map(Some)
}

async fn load(
    database: &DatabasePool,
    data: &Mover_Set,
) -> Result<Load_Summary, Error> {
    database.init_schema().await?;
    let summary = database.load(data).await?;
    info!("Loaded {} records", summary.total());
    Ok(summary)
}
