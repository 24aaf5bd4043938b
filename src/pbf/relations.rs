// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component D.4: relation materialization.

use crate::error::Error;
use crate::model::{EntitySink, Member, MemberType, Relation};
use crate::pbf::info::{get_string, MetadataMode};
use crate::pbf::proto::osmformat;
use crate::pbf::ways::tags_from_parallel_arrays;

fn member_type_from_wire(raw: protobuf::EnumOrUnknown<osmformat::relation::MemberType>) -> Result<MemberType, Error> {
    match raw.enum_value() {
        Ok(osmformat::relation::MemberType::NODE) => Ok(MemberType::Node),
        Ok(osmformat::relation::MemberType::WAY) => Ok(MemberType::Way),
        Ok(osmformat::relation::MemberType::RELATION) => Ok(MemberType::Relation),
        Err(unknown) => Err(Error::UnknownMemberType(unknown)),
    }
}

pub(crate) fn decode_relations<M: MetadataMode, S: EntitySink>(
    raw_relations: &[osmformat::Relation],
    string_table: &[String],
    date_granularity_ms: i64,
    sink: &S,
) -> Result<(), Error> {
    for relation in raw_relations {
        let mut members = Vec::with_capacity(relation.memids.len());
        let mut acc: i64 = 0;
        for i in 0..relation.memids.len() {
            acc = acc.wrapping_add(relation.memids[i]);
            let kind = member_type_from_wire(
                relation
                    .types
                    .get(i)
                    .copied()
                    .unwrap_or(protobuf::EnumOrUnknown::from_i32(0)),
            )?;
            let role_sid = relation.roles_sid.get(i).copied().unwrap_or(0);
            members.push(Member {
                id: acc,
                kind,
                role: get_string(string_table, role_sid as usize),
            });
        }

        let tags = tags_from_parallel_arrays(string_table, &relation.keys, &relation.vals);
        let info = M::info(relation.info.as_ref(), string_table, date_granularity_ms);

        sink.read_relation(Relation {
            id: relation.id(),
            members,
            tags,
            info,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::info::NoMetadata;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CollectingSink {
        relations: RefCell<Vec<Relation>>,
    }

    impl EntitySink for CollectingSink {
        fn read_node(&self, _node: crate::model::Node) {}
        fn read_way(&self, _way: crate::model::Way) {}
        fn read_relation(&self, relation: Relation) {
            self.relations.borrow_mut().push(relation);
        }
    }

    fn node_type() -> protobuf::EnumOrUnknown<osmformat::relation::MemberType> {
        protobuf::EnumOrUnknown::new(osmformat::relation::MemberType::NODE)
    }

    #[test]
    fn relation_with_eight_members_matches_scenario_1() {
        let ids = [15, 16, 17, 20, 100, 101, 102, 98];
        let mut deltas = Vec::with_capacity(ids.len());
        let mut prev = 0i64;
        for id in ids {
            deltas.push(id - prev);
            prev = id;
        }

        let mut relation = osmformat::Relation::new();
        relation.set_id(0);
        relation.memids.extend(deltas);
        relation.types.extend(std::iter::repeat(node_type()).take(ids.len()));
        relation.roles_sid.extend(std::iter::repeat(0).take(ids.len()));

        let sink = CollectingSink::default();
        decode_relations::<NoMetadata, _>(&[relation], &[], 1000, &sink).unwrap();

        let relations = sink.relations.borrow();
        assert_eq!(relations[0].members[0].id, 15);
        assert_eq!(relations[0].members[7].id, 98);
        assert!(relations[0].members.iter().all(|m| m.kind == MemberType::Node));
    }

    #[test]
    fn unknown_member_type_is_a_decode_error() {
        let mut relation = osmformat::Relation::new();
        relation.memids.push(1);
        relation.types.push(protobuf::EnumOrUnknown::from_i32(7));
        relation.roles_sid.push(0);

        let sink = CollectingSink::default();
        let err = decode_relations::<NoMetadata, _>(&[relation], &[], 1000, &sink).unwrap_err();
        assert!(matches!(err, Error::UnknownMemberType(7)));
    }
}
