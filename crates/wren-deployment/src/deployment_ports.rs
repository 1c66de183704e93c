use std::net::TcpListener;

use wren_core::{LauncherError, PortAssignment};

/// Returns true when a listener can be bound on every interface at `port`.
pub fn port_is_free(port: u16) -> bool {
    TcpListener::bind(("0.0.0.0", port)).is_ok()
}

/// Scans upward from `start` for the first port that is free and not reserved.
pub fn find_available_port(
    start: u16,
    reserved: &[u16],
    is_free: &dyn Fn(u16) -> bool,
) -> Option<u16> {
    (start..=u16::MAX).find(|port| !reserved.contains(port) && is_free(*port))
}

/// Resolves the UI port first, then the AI port with the UI port excluded.
pub fn allocate_ports(
    ui_default: u16,
    ai_default: u16,
    is_free: &dyn Fn(u16) -> bool,
) -> Result<PortAssignment, LauncherError> {
    let ui = find_available_port(ui_default, &[], is_free)
        .ok_or(LauncherError::NoFreePort { start: ui_default })?;
    let ai = find_available_port(ai_default, &[ui], is_free)
        .ok_or(LauncherError::NoFreePort { start: ai_default })?;
    if ui != ui_default || ai != ai_default {
        tracing::info!(ui, ai, "default ports taken, using next free ports");
    }
    Ok(PortAssignment { ui, ai })
}
