use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use us_address_parser::{AddressInput, AddressParser, UnifiedAddressParser};

fn bench_address_parsing(c: &mut Criterion) {
    let parser = AddressParser::new().expect("default parser");

    c.bench_function("parse_simple_address", |b| {
        b.iter(|| {
            parser.parse_address_comprehensive(
                black_box("123 Main St, Anchorage, AK 99501"),
                None,
                None,
                None,
            )
        })
    });

    c.bench_function("parse_no_comma_city", |b| {
        b.iter(|| {
            parser.parse_address_comprehensive(
                black_box("456 ELM STREET JUNEAU, AK"),
                None,
                None,
                None,
            )
        })
    });

    c.bench_function("parse_po_box", |b| {
        b.iter(|| {
            parser.parse_address_comprehensive(
                black_box("PO BOX 12345, Apt 5B, Suite 100, Kodiak, AK 99615-1234"),
                None,
                None,
                None,
            )
        })
    });
}

fn bench_batch_parsing(c: &mut Criterion) {
    let parser = UnifiedAddressParser::new().expect("default parser");
    let inputs: Vec<_> = (0..1000)
        .map(|i| {
            AddressInput::new(format!("{i} Ocean Dr, Miami, FL 33139"))
                .with_context_state("Florida")
        })
        .collect();

    c.bench_function("unified_batch_1000", |b| {
        b.iter(|| parser.parse_batch(black_box(&inputs)))
    });
}

criterion_group!(benches, bench_address_parsing, bench_batch_parsing);
criterion_main!(benches);
