use std::path::Path;

use tracing_subscriber::EnvFilter;

const QUIET: &str = "info";
// eframe's renderer and winit are chatty at debug level; keep them at info
// unless RUST_LOG asks otherwise.
const VERBOSE: &str = "digital_whiteboard=debug,eframe=info,egui=info,winit=info";

/// Filter directive for the subscriber. `RUST_LOG` only applies when debug
/// logging is enabled in the settings file.
pub fn directive(debug: bool, rust_log: Option<&str>) -> String {
    match (debug, rust_log) {
        (true, Some(env)) if !env.trim().is_empty() => env.to_owned(),
        (true, _) => VERBOSE.to_owned(),
        (false, _) => QUIET.to_owned(),
    }
}

/// Installs the subscriber and reports where the settings were read from.
pub fn init(debug: bool, settings_path: Option<&Path>) {
    let env = std::env::var("RUST_LOG").ok();
    let directive = directive(debug, env.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(QUIET));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match settings_path {
        Some(path) => {
            tracing::info!(path = %path.display(), %directive, "logging ready")
        }
        None => tracing::info!(%directive, "logging ready, no config dir"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_unless_debug() {
        assert_eq!(directive(false, Some("trace")), "info");
        assert_eq!(directive(false, None), "info");
    }

    #[test]
    fn debug_scopes_to_this_crate() {
        let d = directive(true, None);
        assert!(d.starts_with("digital_whiteboard=debug"));
        assert_eq!(directive(true, Some("  ")), d);
    }

    #[test]
    fn rust_log_wins_in_debug() {
        assert_eq!(directive(true, Some("warn")), "warn");
    }
}
