use std::env;
use std::path::PathBuf;

fn main() {
    let lib = pkg_config::probe_library("librga")
        .or_else(|_| pkg_config::probe_library("rga"))
        .expect("Failed to find rockchip RGA (pkg-config: librga or rga)");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let include_dir = format!("{}/include", manifest_dir);

    let bindings = bindgen::Builder::default()
        .header(format!("{}/rga/RgaApi.h", include_dir))
        .header(format!("{}/rga/im2d.h", include_dir))
        .header(format!("{}/rga/rga.h", include_dir))
        .clang_arg(format!("-I{}/rga", include_dir))
        .clang_args(
            lib.include_paths
                .iter()
                .map(|p| format!("-I{}", p.display())),
        )
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .expect("Unable to generate RGA bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}
