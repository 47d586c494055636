/// Build script for heelsim
/// Embeds version information for `heelsim version`

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");

    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    // Append the short git hash when building from a checkout
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty());

    match hash {
        Some(hash) => println!("cargo:rustc-env=HEELSIM_VERSION={version} ({hash})"),
        None => println!("cargo:rustc-env=HEELSIM_VERSION={version}"),
    }
}
