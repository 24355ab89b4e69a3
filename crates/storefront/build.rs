//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so templates can link a cache-busting
//! `main.<hash>.css` that is safe to cache forever.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Number of hex characters of the digest kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    match fingerprint(&css_path, &manifest_dir.join("static/css/derived")) {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Copy `css_path` into `derived_dir` as `main.<hash>.css` and return the hash.
fn fingerprint(css_path: &Path, derived_dir: &Path) -> io::Result<String> {
    let content = fs::read(css_path)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let hash: String = digest.chars().take(HASH_LEN).collect();

    fs::create_dir_all(derived_dir)?;
    fs::write(derived_dir.join(format!("main.{hash}.css")), &content)?;

    Ok(hash)
}
