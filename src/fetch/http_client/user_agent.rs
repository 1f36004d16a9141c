//! User agent handling for HTTP requests.
//!
//! sec.gov rejects anonymous clients; automated access must declare who is
//! calling and how to reach them.

pub const USER_AGENT: &str = "edgarsync/0.4 (set user_agent to \"Company Name admin@example.com\")";

/// Resolve the configured user agent, falling back to [`USER_AGENT`] when
/// unset or blank.
pub fn resolve_user_agent(config_value: Option<&str>) -> String {
    match config_value.map(str::trim) {
        Some(ua) if !ua.is_empty() => ua.to_string(),
        _ => USER_AGENT.to_string(),
    }
}
