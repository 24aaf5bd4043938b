// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! The PBF wire-format decoder, assembled from components A–E of the
//! design: [frame] reads length-prefixed blocks, [blob] inflates them,
//! [block] walks a primitive block's groups, [dense]/[ways]/[relations]/
//! [info] materialize entities, and [pipeline] ties everything together
//! behind [parse].

mod block;
mod blob;
mod dense;
mod frame;
mod info;
mod pipeline;
mod proto;
mod relations;
mod ways;

pub use pipeline::parse;
