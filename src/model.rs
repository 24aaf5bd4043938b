// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node): a
/// single point with a position and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: HashMap<String, String>,
    pub info: Option<Info>,
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way): an
/// ordered list of node references plus tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub tags: HashMap<String, String>,
    pub info: Option<Info>,
}

/// Represents an [OSM relation](https://wiki.openstreetmap.org/wiki/Relation):
/// an ordered list of typed, named references to other elements, plus tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: i64,
    pub members: Vec<Member>,
    pub tags: HashMap<String, String>,
    pub info: Option<Info>,
}

/// A single member of a [Relation].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: i64,
    pub kind: MemberType,
    pub role: String,
}

/// The type of element a [Member] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Way => write!(f, "way"),
            Self::Relation => write!(f, "relation"),
        }
    }
}

/// Non-geographic metadata attached to an element, populated only when
/// [crate::Options::with_metadata] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub version: i32,
    pub timestamp: SystemTime,
    pub changeset: i64,
    pub uid: i32,
    pub user: String,
    pub visible: bool,
}

impl Info {
    /// Builds the `timestamp` field from a raw delta-accumulated value and
    /// the block's `date_granularity` (milliseconds), per `spec.md` §3:
    /// `timestamp = accumulated_delta * date_granularity_ms / 1000` seconds
    /// since the epoch.
    pub(crate) fn timestamp_from_raw(raw: i64, date_granularity_ms: i64) -> SystemTime {
        let millis = raw.wrapping_mul(date_granularity_ms);
        let seconds = millis / 1000;
        if seconds >= 0 {
            SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64)
        } else {
            SystemTime::UNIX_EPOCH - Duration::from_secs((-seconds) as u64)
        }
    }
}

/// The capability the core requires of a caller-supplied ingestion target.
///
/// Every method takes `&self`, not `&mut self`: the pipeline orchestrator
/// (see [crate::pbf::pipeline]) invokes these methods concurrently from
/// every worker thread, so implementers are responsible for their own
/// internal synchronization. The core performs no locking on a sink's
/// behalf and retains no reference to an emitted value after the call
/// returns.
pub trait EntitySink {
    fn read_node(&self, node: Node);
    fn read_way(&self, way: Way);
    fn read_relation(&self, relation: Relation);
}
