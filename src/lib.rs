// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! A streaming, parallel decoder for the
//! [OpenStreetMap PBF interchange format](https://wiki.openstreetmap.org/wiki/PBF_Format).
//!
//! [parse] reads a framed, optionally compressed byte stream and delivers
//! [Node], [Way] and [Relation] entities to a caller-supplied [EntitySink] as
//! soon as each is decoded, spreading block decompression and deserialization
//! across a pool of worker threads while the input is read sequentially from
//! a single thread. Memory is bounded by a backpressured queue between the
//! reader and the workers, not by the size of the input.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! struct CountingSink;
//!
//! impl osmstream::EntitySink for CountingSink {
//!     fn read_node(&self, _node: osmstream::Node) {}
//!     fn read_way(&self, _way: osmstream::Way) {}
//!     fn read_relation(&self, _relation: osmstream::Relation) {}
//! }
//!
//! let file = BufReader::new(File::open("monaco.osm.pbf").expect("failed to open file"));
//! osmstream::parse(file, &CountingSink, &osmstream::Options::default())
//!     .expect("failed to parse monaco.osm.pbf");
//! ```

mod config;
mod error;
mod model;
mod pbf;

pub use config::Options;
pub use error::Error;
pub use model::{EntitySink, Info, Member, MemberType, Node, Relation, Way};
pub use pbf::parse;
