// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Generated protobuf bindings for the OSM PBF wire format.
//!
//! The actual message definitions live in `src/pbf/protos/*.proto` and are
//! compiled by `build.rs` via `protobuf-codegen`; nothing in this file is
//! hand-written besides the `include!`.

include!(concat!(env!("OUT_DIR"), "/protos/mod.rs"));
