use std::env;
use std::path::{Path, PathBuf};

/// Only the `video` feature links FFmpeg; without it there is nothing to check.
fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");

    if env::var_os("CARGO_FEATURE_VIDEO").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("FFMPEG_DIR") {
        let dir = PathBuf::from(dir);
        if !dir.join("include").is_dir() {
            println!(
                "cargo:warning=FFMPEG_DIR={} has no include/ directory; the video feature needs FFmpeg development headers.",
                dir.display()
            );
        }
        return;
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "windows" {
        warn_about_vcpkg();
    }
}

fn warn_about_vcpkg() {
    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=The video feature needs FFmpeg. On Windows, install it via vcpkg and set FFMPEG_DIR."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = Path::new(&vcpkg_root).join("installed").join(triplet);
    if candidate.exists() {
        println!(
            "cargo:warning=Found vcpkg FFmpeg at {}; set FFMPEG_DIR to it for reliable builds.",
            candidate.display()
        );
    } else {
        println!(
            "cargo:warning=VCPKG_ROOT is set but {} does not exist.",
            candidate.display()
        );
    }
}
