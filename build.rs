use std::env;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| String::from("unknown"));
    if target_os == "windows" {
        println!("cargo:rerun-if-changed=assets/app/icon.ico");
        let mut res = winres::WindowsResource::new();

        if Path::new("assets/app/icon.ico").exists() {
            res.set_icon("assets/app/icon.ico");
        }

        let company = env::var("TUNEHUB_COMPANY").unwrap_or_else(|_| "Tunehub Contributors".into());
        let product = env::var("TUNEHUB_PRODUCT").unwrap_or_else(|_| "Tunehub".into());

        let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());
        res.set("CompanyName", &company);
        res.set("FileDescription", "Music discovery node");
        res.set("ProductName", &product);
        res.set("ProductVersion", &version);
        res.set("FileVersion", &version);
        res.set("OriginalFilename", "tunehub.exe");
        res.set("InternalName", "tunehub");

        if let Err(e) = res.compile() {
            eprintln!("Failed to embed Windows resources: {e}");
        }
    }
}
