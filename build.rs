// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Compiles the OSM PBF wire messages (`fileformat.proto`, `osmformat.proto`)
//! into Rust at build time, so the generated structs and `protobuf::Message`
//! impls never have to be hand-maintained or checked in.

fn main() {
    protobuf_codegen::Codegen::new()
        .pure()
        .includes(["src/pbf/protos"])
        .input("src/pbf/protos/fileformat.proto")
        .input("src/pbf/protos/osmformat.proto")
        .cargo_out_dir("protos")
        .run_from_script();
}
