use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client, StatusCode,
};
use tracing::{info, warn};

use crate::{configuration::Config, error::Error, types::StockMoversQueryId};

pub const STOCK_MOVERS_TYPE: &str = "mdc_stockmovers";
const APPLICATION: &str = "WSJ";

/// Raw outcome of the upstream request. A non-200 status is not an error
/// at this point, the body is handed on as is.
#[derive(Debug)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let mut header_map = HeaderMap::new();
        header_map
            .insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let http = match Client::builder()
            .default_headers(header_map)
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(Error::ReqwestError(e));
            },
        };

        Ok(HTTP { config, http })
    }

    pub fn stock_movers_query(
        &self,
    ) -> Result<[(&'static str, String); 2], Error> {
        let id = StockMoversQueryId {
            application: APPLICATION,
            count: self.config.movers_count,
            region: &self.config.movers_region,
        };

        Ok([
            ("id", serde_json::to_string(&id)?),
            ("type", STOCK_MOVERS_TYPE.to_owned()),
        ])
    }

    pub async fn fetch_stock_movers(&self) -> Result<FetchResponse, Error> {
        let query = self.stock_movers_query()?;
        let response = self
            .http
            .get(self.config.movers_url.clone())
            .query(&query[..])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let fetched = FetchResponse { status, body };

        if fetched.is_success() {
            info!("Scrape successful (code {})", status);
        } else {
            warn!("Scrape failed (code {})", status);
        }

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{lookup_from_pairs, DEFAULT_USER_AGENT};
    use mockito::Matcher;

    const QUERY_ID: &str = r#"{"application":"WSJ","count":100,"region":"US"}"#;

    fn config(base_url: &str) -> Config {
        let url = format!("{}/market-data/stocks/", base_url);
        Config::from_lookup(lookup_from_pairs(&[
            ("MOVERS_URL", url.as_str()),
            ("DB_HOST", "localhost"),
            ("DB_USER", "etl"),
            ("DB_NAME", "mydb"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_stock_movers_query() {
        let http = HTTP::new(config("http://localhost")).unwrap();
        let query = http.stock_movers_query().unwrap();

        assert_eq!(query[0], ("id", QUERY_ID.to_owned()));
        assert_eq!(query[1], ("type", String::from("mdc_stockmovers")));
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/market-data/stocks/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), QUERY_ID.into()),
                Matcher::UrlEncoded("type".into(), "mdc_stockmovers".into()),
            ]))
            .match_header("user-agent", DEFAULT_USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{}}"#)
            .create_async()
            .await;

        let http = HTTP::new(config(&server.url())).unwrap();
        let response = http.fetch_stock_movers().await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"data":{}}"#);
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/market-data/stocks/")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let http = HTTP::new(config(&server.url())).unwrap();
        let response = http.fetch_stock_movers().await.unwrap();

        mock.assert_async().await;
        assert!(!response.is_success());
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "Not Found");
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // Nothing listens on port 9 (discard) on a test host.
        let http = HTTP::new(config("http://127.0.0.1:9")).unwrap();
        let result = http.fetch_stock_movers().await;
        assert!(matches!(result, Err(Error::ReqwestError(_))));
    }
}
