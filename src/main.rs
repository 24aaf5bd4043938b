// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use clap::Parser;

/// Decodes an OSM PBF file and prints a count of each entity kind.
#[derive(Parser)]
struct Cli {
    /// Path to the .osm.pbf file to read
    osm_file: PathBuf,

    /// Materialize per-entity metadata (version, timestamp, changeset, user)
    #[arg(long)]
    with_metadata: bool,
}

#[derive(Default)]
struct CountingSink {
    nodes: AtomicU64,
    ways: AtomicU64,
    relations: AtomicU64,
}

impl osmstream::EntitySink for CountingSink {
    fn read_node(&self, _node: osmstream::Node) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    fn read_way(&self, _way: osmstream::Way) {
        self.ways.fetch_add(1, Ordering::Relaxed);
    }

    fn read_relation(&self, _relation: osmstream::Relation) {
        self.relations.fetch_add(1, Ordering::Relaxed);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    colog::init();

    let cli = Cli::parse();
    let file = BufReader::new(File::open(&cli.osm_file)?);

    let sink = CountingSink::default();
    let options = osmstream::Options {
        with_metadata: cli.with_metadata,
        ..osmstream::Options::default()
    };

    osmstream::parse(file, &sink, &options)?;

    println!("nodes: {}", sink.nodes.load(Ordering::Relaxed));
    println!("ways: {}", sink.ways.load(Ordering::Relaxed));
    println!("relations: {}", sink.relations.load(Ordering::Relaxed));

    Ok(())
}
