//! Windows FFmpeg discovery hints.
//!
//! `ffmpeg-sys-next` finds FFmpeg through `FFMPEG_DIR` or pkg-config. On
//! Windows neither is usually set up, so point at a vcpkg install when one
//! exists.

use std::{env, path::Path};

const WATCHED_VARIABLES: [&str; 4] = ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"];

fn warn(message: impl AsRef<str>) {
    println!("cargo:warning=framegrab: {}", message.as_ref());
}

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let is_windows = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows");
    if !is_windows || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Some(vcpkg_root) = env::var_os("VCPKG_ROOT") else {
        warn("FFMPEG_DIR is unset; install FFmpeg (e.g. `vcpkg install ffmpeg`) and set FFMPEG_DIR");
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| String::from("x64-windows"));
    let install = Path::new(&vcpkg_root).join("installed").join(&triplet);

    if !install.is_dir() {
        warn(format!("no vcpkg FFmpeg for triplet {triplet} under {}", install.display()));
        return;
    }

    warn(format!("using vcpkg FFmpeg at {0}; set FFMPEG_DIR={0} to silence this", install.display()));
    if env::var_os("VCPKGRS_DYNAMIC").is_none() && !triplet.ends_with("-static") {
        warn("dynamic vcpkg triplet detected; set VCPKGRS_DYNAMIC=1");
    }
}
