//! Batch parsing example for us-address-parser.
//!
//! Run with: RUST_LOG=info cargo run --example batch_usage

use us_address_parser::{
    AddressRecord, Error, FailurePolicy, ParserConfig, UnifiedAddressParser,
};

fn record(address: &str, state: &str) -> AddressRecord {
    AddressRecord {
        address: Some(address.to_string()),
        state: Some(state.to_string()),
        ..AddressRecord::default()
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    println!("us-address-parser Batch Usage Example");
    println!("=====================================\n");

    let config = ParserConfig::builder()
        .normalize_city_case(true)
        .failure_policy(FailurePolicy::ZipOnly)
        .build();
    let parser = UnifiedAddressParser::with_config(&config)?;

    let mut records = vec![
        record("12 Ocean Dr, MIAMI, FL 33139.", "Florida"),
        record("456 ELM STREET JUNEAU, AK", "Alaska"),
        record("1 Elm St, Kenai", "Alaska"),
        record("  ", "California"),
        record("PO BOX 12345, Kodiak, AK", "Alaska"),
    ];

    let summary = parser.parse_records(&mut records)?;

    for record in &records {
        println!(
            "{:<30} | {:<10} | {:<5} | {:<5}",
            record.address.as_deref().unwrap_or("-"),
            record.city.as_deref().unwrap_or("-"),
            record.address_state.as_deref().unwrap_or("-"),
            record.zip_code.as_deref().unwrap_or("-"),
        );
    }

    println!("\nSummary");
    println!("-------");
    println!("Records:        {}", summary.total_records);
    println!("Parsed:         {}", summary.parsed);
    println!("Degraded:       {}", summary.degraded);
    println!("ZIPs filled:    {}", summary.zips_filled);
    println!("Cities filled:  {}", summary.cities_filled);
    println!("States filled:  {}", summary.states_filled);
    println!("Throughput:     {:.0} records/s", summary.records_per_second());

    Ok(())
}
