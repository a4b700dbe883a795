//! Version information.

/// The crate version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version string shown in JSON reports.
#[must_use]
pub fn full_version() -> String {
    format!("easycommons {}", version())
}
