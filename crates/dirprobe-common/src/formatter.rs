//! Console line formatting for verdicts and secret masking.

use crate::verdict::Verdict;

/// Fixture keys whose values must never be echoed to the console.
const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "secret",
    "token",
    "api_key",
    "apikey",
    "private_key",
    "cvv",
    "ssn",
    "card_number",
    "credit_card",
];

const MASK: &str = "********";

/// `✅ PASS: message`
pub fn format_verdict(verdict: Verdict, message: &str) -> String {
    format!("{} {}: {}", verdict.symbol(), verdict.label(), message)
}

pub fn format_info(message: &str) -> String {
    format!("ℹ️  {}", message)
}

pub fn format_banner(scenario: &str, description: &str) -> String {
    if description.is_empty() {
        format!("🚀 Running scenario: {}", scenario)
    } else {
        format!("🚀 Running scenario: {} ({})", scenario, description)
    }
}

pub fn format_screenshot(path: &str) -> String {
    format!("📸 Screenshot saved: {}", path)
}

pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    DEFAULT_SENSITIVE_FIELDS.iter().any(|s| key.contains(s))
}

/// Secrets shorter than this are left unmasked.
pub const MIN_SECRET_LEN: usize = 3;

/// Replaces every occurrence of each secret with a fixed mask.
pub fn mask_secrets(text: &str, secrets: &[String]) -> String {
    let mut masked = text.to_string();
    for secret in secrets {
        if secret.chars().count() >= MIN_SECRET_LEN {
            masked = masked.replace(secret.as_str(), MASK);
        }
    }
    masked
}
