use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::helpers::string_or_number;

/// Top level of the `mdc_stockmovers` payload. Categories are kept as raw
/// values so a malformed or absent category only fails when it is read.
#[derive(Debug, Deserialize)]
pub struct StockMoversBody {
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct MoverInstruments {
    pub instruments: Vec<Instrument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub formatted_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub formatted_volume: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub last_price: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub price_change: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub percent_change: Option<String>,
}

/// Value of the `id` query parameter. Field order is part of the request.
#[derive(Debug, Serialize)]
pub struct StockMoversQueryId<'a> {
    pub application: &'a str,
    pub count: u16,
    pub region: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_id_serialization() {
        let id = StockMoversQueryId {
            application: "WSJ",
            count: 100,
            region: "US",
        };
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#"{"application":"WSJ","count":100,"region":"US"}"#
        );
    }

    #[test]
    fn test_instrument_ignores_extra_fields() {
        let instrument: Instrument = serde_json::from_str(
            r#"{
                "ticker": "NVDA",
                "country": "US",
                "formattedName": "NVIDIA Corp.",
                "formattedVolume": "301.5M",
                "lastPrice": 123.45,
                "priceChange": "-1.20",
                "percentChange": "-0.96",
                "url": "https://example.com/nvda"
            }"#,
        )
        .unwrap();

        assert_eq!(instrument.formatted_name, "NVIDIA Corp.");
        assert_eq!(instrument.formatted_volume.as_deref(), Some("301.5M"));
        assert_eq!(instrument.last_price.as_deref(), Some("123.45"));
        assert_eq!(instrument.price_change.as_deref(), Some("-1.20"));
        assert_eq!(instrument.percent_change.as_deref(), Some("-0.96"));
    }

    #[test]
    fn test_instrument_missing_field() {
        let result = serde_json::from_str::<Instrument>(
            r#"{"formattedName":"AAPL","lastPrice":"1","priceChange":"1","percentChange":"1"}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("formattedVolume"), "Error message was: {}", err);
    }
}
