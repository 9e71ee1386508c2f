//! Pure helpers for redacting tokens in logs and scoring token security.
//!
//! The logging layer calls [`mask_token`] before emitting any string that may contain a
//! bearer-style value. [`validate_token_security`] never fails a token for looking
//! test-like or repetitive; those are warnings for operators, not rejections.

/// Marker substituted for tokens too short to mask meaningfully.
pub const REDACTION_MARKER: &str = "***";

const MASK_KEEP: usize = 4;
const MASK_MIN_LEN: usize = 8;
const TOKEN_MIN_LEN: usize = 20;
const DIVERSITY_FLOOR: usize = 5;
const TEST_PREFIXES: &[&str] = &["test", "demo", "sample", "fake", "dummy", "example"];

/// Masks a token for logging: first and last four characters survive, the middle is elided.
///
/// Tokens of eight characters or fewer return the fixed [`REDACTION_MARKER`], since exposing
/// both ends would leave nothing hidden. Counting is character-based, not byte-based.
pub fn mask_token(token: &str) -> String {
	let chars = token.chars().collect::<Vec<_>>();

	if chars.len() <= MASK_MIN_LEN {
		return REDACTION_MARKER.to_owned();
	}

	let head = chars[..MASK_KEEP].iter().collect::<String>();
	let tail = chars[chars.len() - MASK_KEEP..].iter().collect::<String>();

	format!("{head}...{tail}")
}

/// Result of a token security audit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenAudit {
	/// False when any error was recorded; warnings never flip this.
	pub is_valid: bool,
	/// Hard failures, human-readable.
	pub errors: Vec<String>,
	/// Advisory findings, human-readable.
	pub warnings: Vec<String>,
}

/// Scores a token's security posture.
///
/// Tokens shorter than twenty characters are invalid. Test-like prefixes and low character
/// diversity are flagged as warnings only.
pub fn validate_token_security(token: &str) -> TokenAudit {
	let mut errors = Vec::new();
	let mut warnings = Vec::new();
	let length = token.chars().count();

	if length < TOKEN_MIN_LEN {
		errors.push(format!(
			"Token is {length} characters long; at least {TOKEN_MIN_LEN} are required."
		));
	}

	let lowered = token.to_lowercase();

	if let Some(prefix) = TEST_PREFIXES.iter().find(|prefix| lowered.starts_with(*prefix)) {
		warnings.push(format!("Token starts with the test-like prefix `{prefix}`."));
	}

	let mut distinct = token.chars().collect::<Vec<_>>();

	distinct.sort_unstable();
	distinct.dedup();

	if length > 0 && distinct.len() < DIVERSITY_FLOOR {
		warnings.push(format!(
			"Token uses only {} distinct characters; it may be guessable.",
			distinct.len()
		));
	}

	TokenAudit { is_valid: errors.is_empty(), errors, warnings }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn long_tokens_keep_both_ends() {
		let masked = mask_token("abcd1234efgh5678");

		assert!(masked.starts_with("abcd"));
		assert!(masked.ends_with("5678"));
		assert!(!masked.contains("1234efgh"));
	}

	#[test]
	fn short_tokens_collapse_to_the_marker() {
		assert_eq!(mask_token("short"), REDACTION_MARKER);
		assert_eq!(mask_token(""), REDACTION_MARKER);
		// Exactly eight characters still collapses; nine is the first maskable length.
		assert_eq!(mask_token("12345678"), REDACTION_MARKER);
		assert_eq!(mask_token("123456789"), "1234...6789");
	}

	#[test]
	fn masking_counts_characters_not_bytes() {
		let masked = mask_token("ありがとうございます!!");

		assert!(masked.starts_with("ありがと"));
	}

	#[test]
	fn short_tokens_are_invalid() {
		let audit = validate_token_security("abc123");

		assert!(!audit.is_valid);
		assert_eq!(audit.errors.len(), 1);
	}

	#[test]
	fn test_prefixes_warn_without_invalidating() {
		let audit = validate_token_security("test-9f8e7d6c5b4a39281706");

		assert!(audit.is_valid);
		assert!(audit.errors.is_empty());
		assert!(audit.warnings.iter().any(|warning| warning.contains("test")));
	}

	#[test]
	fn low_diversity_warns_without_invalidating() {
		let audit = validate_token_security("aaaabbbbaaaabbbbaaaabbbb");

		assert!(audit.is_valid);
		assert!(audit.warnings.iter().any(|warning| warning.contains("distinct")));
	}

	#[test]
	fn strong_tokens_pass_clean() {
		let audit = validate_token_security("q7Zp3kX9mW2vR8tY5nL0aJ6b");

		assert!(audit.is_valid);
		assert!(audit.errors.is_empty());
		assert!(audit.warnings.is_empty());
	}
}
