use regex::Regex;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Strip terminal colour sequences the engine may embed in its strings.
pub fn strip_ansi(input: &str) -> String {
    match Regex::new(r"\x1b\[[0-9;]*[A-Za-z]") {
        Ok(re) => re.replace_all(input, "").into_owned(),
        Err(_) => input.to_string(),
    }
}
