/// `OPSNEXUS_VERSION` set at build time wins over the Cargo package version.
const fn build_version(override_version: Option<&'static str>) -> &'static str {
    match override_version {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

pub const VERSION: &str = build_version(option_env!("OPSNEXUS_VERSION"));
