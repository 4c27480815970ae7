//! IP address format validation
//!
//! Checks user input against the IPv4 dotted-quad grammar and the IPv6
//! full/compressed grammar before a lookup is allowed. Validation is purely
//! syntactic: no normalization, no DNS, no I/O.
//!
//! IPv4 octets accept up to three digits with the leading-zero forms allowed by
//! `25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?`, so `"01.2.3.4"` is valid while
//! `"256.1.1.1"` and `"0001.1.1.1"` are not. IPv6 accepts the full 8-group
//! form or a compressed form with exactly one `::`; embedded IPv4 suffixes and
//! zone ids are not part of the grammar.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Notification raised when a submission is blocked by the validator
pub const FORMAT_ALERT: &str = "Please enter correct IP address format";

const IPV4_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^{o}\.{o}\.{o}\.{o}$", o = IPV4_OCTET);
    Regex::new(&pattern).unwrap_or_else(|e| unreachable!("invalid IPv4 pattern: {e}"))
});

static IPV6_FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$")
        .unwrap_or_else(|e| unreachable!("invalid IPv6 pattern: {e}"))
});

static IPV6_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{1,4}$").unwrap_or_else(|e| unreachable!("invalid group pattern: {e}"))
});

/// Which literal grammar an input matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpFormat {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl fmt::Display for IpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFormat::V4 => write!(f, "IPv4"),
            IpFormat::V6 => write!(f, "IPv6"),
        }
    }
}

/// Returns true iff `text` is a well-formed IPv4 or IPv6 literal.
pub fn is_valid_ip_format(text: &str) -> bool {
    detect_format(text).is_some()
}

/// Detect the literal grammar `text` matches, if any.
pub fn detect_format(text: &str) -> Option<IpFormat> {
    if IPV4_RE.is_match(text) {
        Some(IpFormat::V4)
    } else if is_ipv6_literal(text) {
        Some(IpFormat::V6)
    } else {
        None
    }
}

fn is_ipv6_literal(text: &str) -> bool {
    match text.split_once("::") {
        None => IPV6_FULL_RE.is_match(text),
        Some((head, tail)) => {
            // a second "::" (or ":::") leaves an empty group on one side
            let (Some(head), Some(tail)) = (ipv6_groups(head), ipv6_groups(tail)) else {
                return false;
            };
            head + tail <= 7
        }
    }
}

/// Count the colon-separated groups in one side of a `::`, or None if any group is malformed.
fn ipv6_groups(side: &str) -> Option<usize> {
    if side.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in side.split(':') {
        if !IPV6_GROUP_RE.is_match(group) {
            return None;
        }
        count += 1;
    }
    Some(count)
}

/// Validation verdict for one input, used by the `validate` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatCheck {
    pub input: String,
    pub valid: bool,
    pub format: Option<IpFormat>,
}

impl FormatCheck {
    pub fn new(input: &str) -> Self {
        let format = detect_format(input);
        Self {
            input: input.to_string(),
            valid: format.is_some(),
            format,
        }
    }
}
