fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Supply a protoc binary if one isn't already on PATH / in PROTOC.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    // Compile proto files to OUT_DIR (used by tonic::include_proto!)
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/ledgermock/v1/common.proto",
                "proto/ledgermock/v1/ordering.proto",
                "proto/ledgermock/v1/delivery.proto",
                "proto/ledgermock/v1/endorsement.proto",
            ],
            &["proto"],
        )?;

    // Tell Cargo to rerun if proto files change
    println!("cargo:rerun-if-changed=proto/");

    Ok(())
}
