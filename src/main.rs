use anyhow::Result;
use log::info;

use opensearch_expiry_probe::aggregation::date_range_aggregation;
use opensearch_expiry_probe::client::SearchClient;
use opensearch_expiry_probe::fixtures;

fn main() -> Result<()> {
    env_logger::init();

    let endpoint = std::env::var("OPENSEARCH_URL")
        .unwrap_or_else(|_| "http://localhost:9200".to_string());
    let index = "test-date-range-aggregation";

    let client = SearchClient::new(&endpoint)?;

    fixtures::seed_products(&client, index)?;
    info!("seeded {} products into {}", fixtures::products().len(), index);

    let aggregation = date_range_aggregation(fixtures::EXPIRY_FIELD, &fixtures::expiry_ranges());
    let response = client.search_aggregation(index, "expiry_ranges", &aggregation)?;
    let buckets = response.date_range_buckets("expiry_ranges")?;

    println!("expiry buckets in {}:", index);
    for bucket in buckets {
        println!("  {}: {} documents", bucket.key, bucket.doc_count);
    }

    let deleted = client.purge_indices(&[fixtures::SECURITY_INDEX])?;
    info!("cleanup deleted {deleted} indices");
    Ok(())
}
