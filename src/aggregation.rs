use std::collections::HashMap;

use anyhow::{Result, bail};
use serde::Deserialize;
use serde_json::{Value, json};

/// One named range of a `date_range` aggregation, with millisecond-epoch
/// boundaries. `from` is inclusive, `to` is exclusive on the server side.
#[derive(Debug, Clone)]
pub struct DateRangeExpression {
    pub key: String,
    pub from: i64,
    pub to: i64,
}

impl DateRangeExpression {
    pub fn new(key: &str, from: i64, to: i64) -> Self {
        DateRangeExpression {
            key: key.to_string(),
            from,
            to,
        }
    }
}

/// Builds the request body of a `date_range` aggregation over `field`.
pub fn date_range_aggregation(field: &str, ranges: &[DateRangeExpression]) -> Value {
    let ranges: Vec<Value> = ranges
        .iter()
        .map(|range| json!({ "key": range.key, "from": range.from, "to": range.to }))
        .collect();

    json!({
        "date_range": {
            "field": field,
            "ranges": ranges,
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub aggregations: HashMap<String, DateRangeAggregate>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeAggregate {
    pub buckets: Vec<DateRangeBucket>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeBucket {
    pub key: String,
    // The server reports boundaries as doubles, alongside *_as_string twins.
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub doc_count: u64,
}

impl SearchResponse {
    /// Returns the buckets of the named `date_range` aggregate.
    pub fn date_range_buckets(&self, name: &str) -> Result<&[DateRangeBucket]> {
        match self.aggregations.get(name) {
            Some(aggregate) => Ok(&aggregate.buckets),
            None => bail!("search response has no aggregate named {name:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_date_range_request_body() {
        let ranges = [
            DateRangeExpression::new("first", 1_000, 1_999),
            DateRangeExpression::new("second", 2_000, 2_999),
        ];
        let body = date_range_aggregation("expDate", &ranges);

        assert_eq!(
            body,
            json!({
                "date_range": {
                    "field": "expDate",
                    "ranges": [
                        { "key": "first", "from": 1_000, "to": 1_999 },
                        { "key": "second", "from": 2_000, "to": 2_999 },
                    ],
                }
            })
        );
    }

    #[test]
    fn parses_buckets_from_search_response() {
        let raw = json!({
            "took": 4,
            "timed_out": false,
            "hits": { "total": { "value": 6, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "expiry_ranges": {
                    "buckets": [
                        {
                            "key": "from-1-to-2-days",
                            "from": 1676937600000.0,
                            "from_as_string": "2023-02-21T00:00:00.000Z",
                            "to": 1677110399000.0,
                            "to_as_string": "2023-02-22T23:59:59.000Z",
                            "doc_count": 2
                        },
                        { "key": "from-3-to-4-days", "from": 1677110400000.0, "to": 1677283199000.0, "doc_count": 2 },
                        { "key": "from-5-to-6-days", "from": 1677283200000.0, "to": 1677455999000.0, "doc_count": 2 }
                    ]
                }
            }
        });

        let response: SearchResponse = serde_json::from_value(raw).unwrap();
        let buckets = response.date_range_buckets("expiry_ranges").unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].key, "from-1-to-2-days");
        assert_eq!(buckets[0].doc_count, 2);
        assert_eq!(buckets[0].from, Some(1676937600000.0));
    }

    #[test]
    fn missing_aggregate_is_an_error() {
        let response: SearchResponse = serde_json::from_value(json!({ "hits": {} })).unwrap();

        assert!(response.date_range_buckets("expiry_ranges").is_err());
    }
}
