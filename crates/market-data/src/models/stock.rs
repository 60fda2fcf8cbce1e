use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Envelope returned by `GET /stocks`.
#[derive(Clone, Debug, Deserialize)]
pub struct StockListResponse {
    #[serde(default)]
    pub stocks: Vec<RemoteStock>,
}

/// A listed stock as the exchange reports it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStock {
    pub id: i32,
    pub ticker: String,
    pub company_name: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub outstanding_shares: i64,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub delisted: bool,
    pub stock_type: String,
    #[serde(default)]
    pub book_value: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_decimal")]
    pub dividend_per_share: Option<Decimal>,
    #[serde(default)]
    pub dividend_period: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// The exchange sends prices as decimal strings; bare numbers are accepted too.
    #[serde(deserialize_with = "deserialize_decimal")]
    pub share_price: Decimal,
}

/// One holder line inside a stock detail payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteShareholder {
    pub username: String,
    pub shares: i64,
    pub account_id: i32,
}

/// Payload returned by `GET /stock/{ticker}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemoteStockDetail {
    #[serde(flatten)]
    pub stock: RemoteStock,
    #[serde(default)]
    pub shareholders: Vec<RemoteShareholder>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Number(f64),
}

impl DecimalRepr {
    fn into_decimal<E: serde::de::Error>(self) -> Result<Decimal, E> {
        match self {
            DecimalRepr::Text(s) => Decimal::from_str(s.trim())
                .or_else(|_| Decimal::from_scientific(s.trim()))
                .map_err(|e| E::custom(format!("invalid decimal '{}': {}", s, e))),
            DecimalRepr::Number(n) => {
                Decimal::try_from(n).map_err(|e| E::custom(format!("invalid decimal {}: {}", n, e)))
            }
        }
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    DecimalRepr::deserialize(deserializer)?.into_decimal()
}

fn deserialize_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DecimalRepr>::deserialize(deserializer)?
        .map(DecimalRepr::into_decimal)
        .transpose()
}
