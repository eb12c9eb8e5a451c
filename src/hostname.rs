//! Host identifier resolution.

use crate::config::AgentConfig;

/// The configured hostname override, or the system hostname.
pub fn effective_hostname(config: &AgentConfig) -> String {
    match config.hostname.as_deref().map(str::trim) {
        Some(hostname) if !hostname.is_empty() => hostname.to_string(),
        _ => system_hostname(),
    }
}

/// Hostname as reported by the OS. `HOSTNAME`/`COMPUTERNAME` are consulted
/// only if the OS gives nothing usable.
pub fn system_hostname() -> String {
    let os = gethostname::gethostname().into_string().ok();
    pick_hostname(os, |key| std::env::var(key).ok())
}

fn pick_hostname<F>(os: Option<String>, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    os.into_iter()
        .chain(["HOSTNAME", "COMPUTERNAME"].iter().filter_map(|key| env(key)))
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
