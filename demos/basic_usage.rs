//! Basic usage example for us-address-parser.
//!
//! Run with: cargo run --example basic_usage

use us_address_parser::{AddressParser, Error, ZipExtractor};

fn main() -> Result<(), Error> {
    env_logger::init();

    println!("us-address-parser Basic Usage Example");
    println!("=====================================\n");

    let parser = AddressParser::new()?;

    let addresses = vec![
        "123 Main St, Anchorage, AK 99501",
        "456 Elm Street Juneau, AK",
        "PO BOX 524, Honolulu, HI 96813",
        "77 Grove Ln Boise ID 83702-1234",
        "100 ST",
    ];

    println!("1. Parsing addresses");
    println!("--------------------");
    for address in addresses {
        let parsed = parser.parse_address_comprehensive(address, None, None, None)?;
        println!("\nOriginal: {address}");
        println!("  Street: {}", parsed.street);
        println!("  City:   {}", parsed.city.as_deref().unwrap_or("-"));
        println!("  State:  {}", parsed.state.as_deref().unwrap_or("-"));
        println!("  ZIP:    {}", parsed.zip.as_deref().unwrap_or("-"));
    }

    println!("\n2. Known values are never overwritten");
    println!("-------------------------------------");
    let parsed = parser.parse_address_comprehensive(
        "789 Oak Ave, Miami, FL 33101",
        Some("00000"),
        None,
        None,
    )?;
    println!("Existing ZIP 00000 kept: {:?}", parsed.zip);

    println!("\n3. ZIP helpers");
    println!("--------------");
    let zips = ZipExtractor::default();
    for zip in ["995011234", "99501-1234", "9950"] {
        println!(
            "{zip}: valid={} formatted={}",
            zips.validate_zip_format(zip),
            zips.format_zip(zip)
        );
    }

    Ok(())
}
