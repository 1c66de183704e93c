use crate::onboarding_console::OperatorConsole;

const TELEMETRY_DOCS_URL: &str = "https://docs.getwren.ai/overview/telemetry";

/// Telemetry is on unless the static disable switch is set; the operator only
/// gets an informational notice, never an interactive opt-in prompt.
pub fn evaluate_telemetry_preferences(
    console: &mut dyn OperatorConsole,
    telemetry_disabled: bool,
) -> bool {
    if telemetry_disabled {
        console.notice("You have disabled telemetry, Wren AI will not collect any data.");
        return false;
    }
    console.notice("Wren AI relies on anonymous usage statistics to continuously improve.");
    console.notice(&format!(
        "You can opt out of sharing these statistics by adding the flag `--disable-telemetry` as described at {TELEMETRY_DOCS_URL}"
    ));
    true
}

#[cfg(test)]
mod tests {
    use super::evaluate_telemetry_preferences;
    use crate::LineConsole;
    use std::io::Cursor;

    #[test]
    fn unit_telemetry_defaults_to_enabled_without_reading_input() {
        let mut console = LineConsole::new(Cursor::new(Vec::new()));
        assert!(evaluate_telemetry_preferences(&mut console, false));
        assert!(console
            .transcript()
            .iter()
            .any(|line| line.contains("--disable-telemetry")));
    }

    #[test]
    fn unit_telemetry_static_disable_short_circuits() {
        let mut console = LineConsole::new(Cursor::new(Vec::new()));
        assert!(!evaluate_telemetry_preferences(&mut console, true));
        assert_eq!(console.transcript().len(), 1);
    }
}
