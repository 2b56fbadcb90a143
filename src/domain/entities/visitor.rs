//! Visitor identity attached to a click.

/// Placeholder IP recorded when no proxy header carried a client address.
pub const UNKNOWN_IP: &str = "unknown";

/// The caller as seen by the attribution recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub ip: String,
    pub user_agent: Option<String>,
}

impl Visitor {
    /// Creates a visitor; a blank IP is replaced with [`UNKNOWN_IP`].
    pub fn new(ip: impl Into<String>, user_agent: Option<&str>) -> Self {
        let ip = ip.into();
        let ip = if ip.trim().is_empty() {
            UNKNOWN_IP.to_string()
        } else {
            ip.trim().to_string()
        };

        Self {
            ip,
            user_agent: user_agent
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(str::to_string),
        }
    }

    /// Returns true if no client address could be determined.
    pub fn is_unknown(&self) -> bool {
        self.ip == UNKNOWN_IP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_trims_values() {
        let visitor = Visitor::new(" 198.51.100.4 ", Some(" Mozilla/5.0 "));

        assert_eq!(visitor.ip, "198.51.100.4");
        assert_eq!(visitor.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert!(!visitor.is_unknown());
    }

    #[test]
    fn test_blank_ip_becomes_unknown() {
        let visitor = Visitor::new("  ", None);

        assert_eq!(visitor.ip, UNKNOWN_IP);
        assert!(visitor.is_unknown());
    }

    #[test]
    fn test_blank_user_agent_dropped() {
        let visitor = Visitor::new("10.0.0.1", Some(""));
        assert!(visitor.user_agent.is_none());
    }
}
