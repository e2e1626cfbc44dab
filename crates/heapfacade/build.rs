fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();

    println!("cargo:rustc-check-cfg=cfg(embedded_backend)");

    // The embedded backend is forced on bare wasm32, which has no native
    // allocator to bind to.
    let embedded_feature = std::env::var_os("CARGO_FEATURE_EMBEDDED").is_some();
    let bare_wasm = target_arch == "wasm32" && target_os != "wasi";
    if embedded_feature || bare_wasm {
        println!("cargo:rustc-cfg=embedded_backend");
    }

    match target_os.as_str() {
        "linux" => {
            // Only the heapfacade_* symbols leave the cdylib.
            let script = format!("{}/linker/version_script.lds", manifest_dir);
            println!(
                "cargo:rustc-cdylib-link-arg=-Wl,--version-script={}",
                script
            );
            println!("cargo:rerun-if-changed=linker/version_script.lds");
        }
        "macos" => {
            // All symbols are exported by default on macOS.
        }
        _ => {}
    }
    println!("cargo:rerun-if-changed=build.rs");
}
