// OFFLINE BUILD SHIM — never compiled in the default (no-feature) build.
// See Cargo.toml in this directory.
#![no_std]
