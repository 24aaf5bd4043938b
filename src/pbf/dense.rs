// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component D.1 (dense-node reconstruction) and D.2 (tag unpacking).

use std::collections::HashMap;

use crate::model::{EntitySink, Node};
use crate::pbf::block::CoordinateConverter;
use crate::pbf::info::MetadataMode;
use crate::pbf::proto::osmformat;

/// Walks a dense-node group, emitting one [Node] per element to `sink`.
///
/// Maintains the `id`/`lat`/`lon` running accumulators plus the key/value
/// cursor described in `spec.md` §4.D.1, and — when `M = `[crate::pbf::info::WithMetadata]`
/// — the four extra metadata accumulators, entirely monomorphized via `M`.
pub(crate) fn decode_dense_nodes<M: MetadataMode, S: EntitySink>(
    dense: &osmformat::DenseNodes,
    string_table: &[String],
    coord: CoordinateConverter,
    date_granularity_ms: i64,
    sink: &S,
) {
    let mut id_acc: i64 = 0;
    let mut lat_acc: i64 = 0;
    let mut lon_acc: i64 = 0;
    let mut kv_cursor: usize = 0;
    let mut info_state = M::DenseState::default();

    let count = dense.id.len();
    for i in 0..count {
        id_acc = id_acc.wrapping_add(dense.id[i]);
        lat_acc = lat_acc.wrapping_add(*dense.lat.get(i).unwrap_or(&0));
        lon_acc = lon_acc.wrapping_add(*dense.lon.get(i).unwrap_or(&0));

        let (new_cursor, tags) = unpack_tags(string_table, kv_cursor, &dense.keys_vals);
        kv_cursor = new_cursor;

        let info = M::dense_info(
            &mut info_state,
            dense.denseinfo.as_ref(),
            i,
            string_table,
            date_granularity_ms,
        );

        sink.read_node(Node {
            id: id_acc,
            lat: coord.lat(lat_acc),
            lon: coord.lon(lon_acc),
            tags,
            info,
        });
    }
}

/// Unpacks one entity's worth of tags from the shared dense key/value
/// stream, per `spec.md` §4.D.2: reads `(key_sid, val_sid)` pairs until a
/// lone `0`, which it consumes. Returns the cursor positioned right after
/// that terminator, and a freshly-allocated tag map. Pure and
/// allocation-local: strings are copied out of the string table, never
/// borrowed from it.
pub(crate) fn unpack_tags(
    string_table: &[String],
    mut cursor: usize,
    keys_vals: &[i32],
) -> (usize, HashMap<String, String>) {
    let mut tags = HashMap::new();
    while cursor < keys_vals.len() {
        let key_sid = keys_vals[cursor];
        if key_sid == 0 {
            cursor += 1;
            break;
        }
        let val_sid = keys_vals.get(cursor + 1).copied().unwrap_or(0);
        tags.insert(
            crate::pbf::info::get_string(string_table, key_sid as usize),
            crate::pbf::info::get_string(string_table, val_sid as usize),
        );
        cursor += 2;
    }
    (cursor, tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::info::{NoMetadata, WithMetadata};
    use std::cell::RefCell;

    #[test]
    fn tag_unpack_micro_test() {
        let strings = vec![
            "".to_string(),
            "k1".to_string(),
            "v1".to_string(),
            "k2".to_string(),
            "v2".to_string(),
        ];
        let stream = [1, 2, 3, 4, 0];
        let (cursor, tags) = unpack_tags(&strings, 0, &stream);
        assert_eq!(cursor, 5);
        assert_eq!(tags.get("k1"), Some(&"v1".to_string()));
        assert_eq!(tags.get("k2"), Some(&"v2".to_string()));
    }

    #[test]
    fn tag_unpack_empty_stream_leaves_cursor_and_tags_empty() {
        let strings: Vec<String> = vec![];
        let (cursor, tags) = unpack_tags(&strings, 0, &[]);
        assert_eq!(cursor, 0);
        assert!(tags.is_empty());
    }

    #[derive(Default)]
    struct CollectingSink {
        nodes: RefCell<Vec<Node>>,
    }

    impl EntitySink for CollectingSink {
        fn read_node(&self, node: Node) {
            self.nodes.borrow_mut().push(node);
        }
        fn read_way(&self, _way: crate::model::Way) {}
        fn read_relation(&self, _relation: crate::model::Relation) {}
    }

    #[test]
    fn dense_nodes_without_tags_get_empty_maps_and_cursor_stays_at_zero() {
        let mut dense = osmformat::DenseNodes::new();
        dense.id.extend([1, 1, 1]);
        dense.lat.extend([1, 1, 1]);
        dense.lon.extend([1, 1, 1]);

        let sink = CollectingSink::default();
        let coord = CoordinateConverter {
            lat_offset: 0,
            lon_offset: 0,
            granularity: 100,
        };
        decode_dense_nodes::<NoMetadata, _>(&dense, &[], coord, 1000, &sink);

        let nodes = sink.nodes.borrow();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].id, 1);
        assert_eq!(nodes[2].id, 3);
        assert!(nodes.iter().all(|n| n.tags.is_empty()));
        assert!(nodes.iter().all(|n| n.info.is_none()));
    }

    #[test]
    fn with_metadata_attaches_info_from_dense_info_bundle() {
        let mut dense = osmformat::DenseNodes::new();
        dense.id.push(1);
        dense.lat.push(1000000); // 1e-9 * 100 * 1_000_000 = 0.1, see below
        dense.lon.push(0);

        let mut info = osmformat::DenseInfo::new();
        info.version.push(1);
        info.timestamp.push(1446404400);
        info.changeset.push(1);
        info.uid.push(1);
        info.user_sid.push(1);
        dense.denseinfo = protobuf::MessageField::some(info);

        let strings = vec!["".to_string(), "Dummy User".to_string()];
        let sink = CollectingSink::default();
        let coord = CoordinateConverter {
            lat_offset: 0,
            lon_offset: 0,
            granularity: 100,
        };
        decode_dense_nodes::<WithMetadata, _>(&dense, &strings, coord, 1000, &sink);

        let nodes = sink.nodes.borrow();
        assert_eq!(nodes.len(), 1);
        let n = &nodes[0];
        assert!((n.lat - 0.1).abs() < 1e-12);
        let info = n.info.as_ref().unwrap();
        assert_eq!(info.user, "Dummy User");
        assert!(info.visible);
    }
}
