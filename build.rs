use std::io::Write;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let root: std::path::PathBuf = std::env::var("CARGO_MANIFEST_DIR").unwrap().into();
    let js_dir = root.join("public").join("js");

    std::fs::create_dir_all(&js_dir).unwrap();

    // The reading page mounts the tiptap editor from these bundles.
    std::fs::File::create(js_dir.join("tiptap-bundle.min.js"))
        .unwrap()
        .write_all(leptos_tiptap_build::TIPTAP_BUNDLE_MIN_JS.as_bytes())
        .unwrap();

    std::fs::File::create(js_dir.join("tiptap.js"))
        .unwrap()
        .write_all(leptos_tiptap_build::TIPTAP_JS.as_bytes())
        .unwrap();
}
