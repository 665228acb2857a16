//! Terminal-facing setup: log level selection and tracing initialisation.

use std::io::IsTerminal;

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_disable_color(
    stderr_is_terminal: bool,
    no_color_env: bool,
    dumb_terminal: bool,
) -> bool {
    !stderr_is_terminal || no_color_env || dumb_terminal
}

/// Default filter directive when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose count > info.
pub(crate) fn default_log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the global subscriber writing to stderr.
pub(crate) fn init_tracing(default_level: &str) {
    let no_color = should_disable_color(
        std::io::stderr().is_terminal(),
        no_color_env_requested(),
        is_dumb_terminal(),
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}
