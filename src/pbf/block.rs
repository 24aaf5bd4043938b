// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component C: the block decoder. Parses the inflated bytes of a data
//! block as a [osmformat::PrimitiveBlock] and dispatches each primitive
//! group to the entity materializer (component D).

use protobuf::Message;

use crate::error::Error;
use crate::model::EntitySink;
use crate::pbf::info::MetadataMode;
use crate::pbf::proto::osmformat;
use crate::pbf::{dense, relations, ways};

/// Converts stored coordinate units to degrees, per `spec.md` §3:
/// `coord = 1e-9 * (offset + granularity * delta_sum)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CoordinateConverter {
    pub lat_offset: i64,
    pub lon_offset: i64,
    pub granularity: i64,
}

impl CoordinateConverter {
    fn from_block(block: &osmformat::PrimitiveBlock) -> Self {
        Self {
            lat_offset: block.lat_offset(),
            lon_offset: block.lon_offset(),
            granularity: block.granularity() as i64,
        }
    }

    pub fn lat(&self, delta_sum: i64) -> f64 {
        1e-9 * (self.lat_offset + self.granularity * delta_sum) as f64
    }

    pub fn lon(&self, delta_sum: i64) -> f64 {
        1e-9 * (self.lon_offset + self.granularity * delta_sum) as f64
    }
}

/// Builds the owned string table out of a block's raw byte strings. Entries
/// are decoded lossily (`spec.md` is silent on non-UTF-8 string-table
/// entries, and every reference OSM PBF reader treats them as UTF-8 text).
fn build_string_table(raw: &osmformat::StringTable) -> Vec<String> {
    raw.s
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

/// Parses `bytes` as a [osmformat::PrimitiveBlock] and emits every entity in
/// every group to `sink`, per `spec.md` §4.C.
pub(crate) fn decode_block<M: MetadataMode, S: EntitySink>(
    bytes: &[u8],
    sink: &S,
) -> Result<(), Error> {
    let block = osmformat::PrimitiveBlock::parse_from_bytes(bytes)?;
    let string_table = build_string_table(&block.stringtable);
    let coord = CoordinateConverter::from_block(&block);
    let date_granularity_ms = block.date_granularity() as i64;

    log::debug!(
        "decoding block: {} bytes, {} string(s), {} group(s)",
        bytes.len(),
        string_table.len(),
        block.primitivegroup.len()
    );

    for group in &block.primitivegroup {
        decode_group::<M, S>(group, &string_table, coord, date_granularity_ms, sink)?;
    }

    Ok(())
}

fn decode_group<M: MetadataMode, S: EntitySink>(
    group: &osmformat::PrimitiveGroup,
    string_table: &[String],
    coord: CoordinateConverter,
    date_granularity_ms: i64,
    sink: &S,
) -> Result<(), Error> {
    if !group.nodes.is_empty() {
        return Err(Error::NodesNotSupported);
    }

    if let Some(dense) = group.dense.as_ref() {
        log::trace!("group: {} dense node(s)", dense.id.len());
        dense::decode_dense_nodes::<M, S>(dense, string_table, coord, date_granularity_ms, sink);
        return Ok(());
    }

    if !group.ways.is_empty() {
        log::trace!("group: {} way(s)", group.ways.len());
        ways::decode_ways::<M, S>(&group.ways, string_table, date_granularity_ms, sink);
        return Ok(());
    }

    if !group.relations.is_empty() {
        log::trace!("group: {} relation(s)", group.relations.len());
        relations::decode_relations::<M, S>(&group.relations, string_table, date_granularity_ms, sink)?;
        return Ok(());
    }

    Err(Error::EmptyGroup)
}
