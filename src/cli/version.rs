//! `--version` handling.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("edu {}", VERSION)
}

/// Print the version string and exit successfully.
pub fn handle_version_command() -> ! {
    println!("{}", version_string());
    std::process::exit(0)
}
