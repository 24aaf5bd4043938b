// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component D.3: way materialization.

use std::collections::HashMap;

use crate::model::{EntitySink, Way};
use crate::pbf::info::{get_string, MetadataMode};
use crate::pbf::proto::osmformat;

/// Builds a tag map from a way/relation's parallel `keys`/`vals` string-table
/// index arrays — distinct from the dense nodes' cursor-based scheme in
/// [crate::pbf::dense::unpack_tags]: here the two arrays are already the
/// same length, one slot per tag.
pub(crate) fn tags_from_parallel_arrays(
    string_table: &[String],
    keys: &[u32],
    vals: &[u32],
) -> HashMap<String, String> {
    let mut tags = HashMap::with_capacity(keys.len());
    for (k, v) in keys.iter().zip(vals.iter()) {
        tags.insert(
            get_string(string_table, *k as usize),
            get_string(string_table, *v as usize),
        );
    }
    tags
}

pub(crate) fn decode_ways<M: MetadataMode, S: EntitySink>(
    raw_ways: &[osmformat::Way],
    string_table: &[String],
    date_granularity_ms: i64,
    sink: &S,
) {
    for way in raw_ways {
        let mut node_ids = Vec::with_capacity(way.refs.len());
        let mut acc: i64 = 0;
        for delta in &way.refs {
            acc = acc.wrapping_add(*delta);
            node_ids.push(acc);
        }

        let tags = tags_from_parallel_arrays(string_table, &way.keys, &way.vals);
        let info = M::info(way.info.as_ref(), string_table, date_granularity_ms);

        sink.read_way(Way {
            id: way.id(),
            node_ids,
            tags,
            info,
        });
    }
}
