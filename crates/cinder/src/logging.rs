//! Tracing subscriber setup.
//!
//! Output goes to stderr so it never mixes with translated C on stdout.
//! The filter is read from `CINDER_LOG`, then `RUST_LOG`, using the usual
//! `RUST_LOG` syntax (e.g. `debug`, `cinder_emit=trace`). `-v` and `-vv`
//! override both.

use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity count and the environment's setting.
fn directive(verbosity: u8, env: Option<String>) -> String {
    match verbosity {
        0 => env.unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn env_directive() -> Option<String> {
    std::env::var("CINDER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder().parse_lossy(directive(verbosity, env_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_warn() {
        assert_eq!(directive(0, None), "warn");
    }

    #[test]
    fn test_env_is_used_without_flags() {
        assert_eq!(directive(0, Some("cinder_emit=trace".into())), "cinder_emit=trace");
    }

    #[test]
    fn test_verbosity_overrides_env() {
        assert_eq!(directive(1, Some("error".into())), "info");
        assert_eq!(directive(2, None), "debug");
        assert_eq!(directive(5, None), "debug");
    }
}
