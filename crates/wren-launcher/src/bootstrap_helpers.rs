use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so stdout stays readable for the operator and `--report-json`.
pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub(crate) const BANNER: &str = r#"
 __        __                  _    ___
 \ \      / / __ ___ _ __     / \  |_ _|
  \ \ /\ / / '__/ _ \ '_ \   / _ \  | |
   \ V  V /| | |  __/ | | | / ___ \ | |
    \_/\_/ |_|  \___|_| |_|/_/   \_\___|
"#;

pub(crate) fn print_banner() {
    let rule = "=".repeat(55);
    println!("{rule}");
    println!("{}", BANNER.trim_matches('\n'));
    println!("{rule}");
}

/// Blocks until the operator presses Enter or stdin closes.
pub(crate) fn pause_for_acknowledgement() {
    println!("Press Enter to exit");
    let mut line = String::new();
    if let Err(error) = std::io::stdin().read_line(&mut line) {
        tracing::debug!(error = %error, "pause read failed");
    }
}

/// Pause decision when the CLI failed to parse, so `pause_on_exit` is unknown.
///
/// Honors an explicit `--pause-on-exit[=bool]` on the command line first, then
/// `WREN_PAUSE_ON_EXIT`, and otherwise pauses.
pub(crate) fn pause_requested_after_parse_error(args: &[String], env_value: Option<&str>) -> bool {
    let from_args = args.iter().rev().find_map(|arg| {
        if arg == "--pause-on-exit" {
            return Some("true");
        }
        arg.strip_prefix("--pause-on-exit=")
    });
    match from_args.or(env_value).map(str::trim) {
        Some(value) => !matches!(
            value.to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::pause_requested_after_parse_error;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn unit_parse_error_pause_defaults_on() {
        assert!(pause_requested_after_parse_error(&args(&["--ui-port", "0"]), None));
    }

    #[test]
    fn unit_parse_error_pause_honors_flag_before_env() {
        assert!(!pause_requested_after_parse_error(
            &args(&["--ui-port", "0", "--pause-on-exit=false"]),
            Some("true")
        ));
        assert!(pause_requested_after_parse_error(
            &args(&["--pause-on-exit"]),
            Some("false")
        ));
        assert!(!pause_requested_after_parse_error(&args(&[]), Some("false")));
    }
}
