use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use clap::Parser;
use hopscotch_map::HopscotchTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "values", default_value_t = 100_000)]
    values: u64,

    #[arg(short = 'b', long = "initial_buckets", default_value_t = 16)]
    initial_buckets: usize,
}

fn main() {
    let args = Args::parse();
    let hasher = RandomState::new();
    let rehash = |value: &u64| hasher.hash_one(value);

    let mut table: HopscotchTable<u64> = HopscotchTable::with_bucket_count(args.initial_buckets);

    println!(
        "Inserting {} values starting from {} buckets...",
        args.values,
        table.bucket_count()
    );

    for value in 0..args.values {
        let hash = rehash(&value);
        match table.entry(hash, |v| *v == value, rehash) {
            hopscotch_map::table::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            hopscotch_map::table::Entry::Occupied(_) => {
                panic!("value already present: {}", value);
            }
        }
    }

    table.debug_stats().print();

    println!("Distance-from-home histogram:");
    let histogram = table.distance_histogram(rehash);
    let max = histogram.iter().copied().max().unwrap_or(0).max(1);
    for (distance, count) in histogram.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let width = count * 60 / max;
        println!("{:>2} | {} ({})", distance, "#".repeat(width), count);
    }
}
