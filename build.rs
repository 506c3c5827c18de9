use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};

// Fingerprint the static assets so templates can cache-bust the stylesheet
// link. The hash covers file names and contents, in name order.
fn main() {
    println!("cargo:rerun-if-changed=static/");

    let mut paths: Vec<_> = fs::read_dir("static")
        .expect("static directory is missing")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut hasher = DefaultHasher::new();
    for path in paths {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            name.hash(&mut hasher);
        }
        fs::read(&path)
            .expect("unreadable static asset")
            .hash(&mut hasher);
    }

    let hash = format!("{:x}", hasher.finish());
    println!("cargo:rustc-env=STATIC_HASH={}", &hash[..8]);
}
