extern crate glob;
extern crate protobuf_codegen;

use protobuf_codegen::Codegen;

fn main() {
    // Find all .proto files in src/protos
    let proto_files = glob::glob("src/protos/*.proto")
        .expect("Failed to read glob pattern")
        .filter_map(|entry| entry.ok())
        .collect::<Vec<_>>();

    for file in &proto_files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    Codegen::new()
        .pure()
        .cargo_out_dir("protos")
        .inputs(&proto_files)
        .include("src/protos")
        .run_from_script();
}
