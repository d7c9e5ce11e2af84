use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp shape the cluster's `expDate` field mapping expects.
pub const EXP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub cost: u32,
    #[serde(rename = "expDate", with = "exp_date_format")]
    pub exp_date: DateTime<Utc>,
}

impl ProductDetails {
    pub fn new(name: &str, cost: u32, exp_date: DateTime<Utc>) -> Self {
        ProductDetails {
            name: name.to_string(),
            cost,
            exp_date,
        }
    }
}

mod exp_date_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::EXP_DATE_FORMAT;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(EXP_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, EXP_DATE_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(de::Error::custom)
    }
}
