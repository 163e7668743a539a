// OFFLINE BUILD SHIM — never compiled in the default (no-feature) build.
#![no_std]
