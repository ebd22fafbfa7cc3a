//! Input normalization applied before profile and address payloads are sent.

/// Strips every character that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
	value.chars().filter(char::is_ascii_digit).collect()
}

/// Formats an 11-digit Brazilian mobile number as `(DD) DDDDD-DDDD`.
///
/// Inputs with any other digit count are returned unchanged.
pub fn format_phone(value: &str) -> String {
	let digits = digits_only(value);

	if digits.len() != 11 {
		return value.to_owned();
	}

	format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
}

/// Formats a postal code (CEP) as `DDDDD-DDD`, truncating extra digits.
pub fn format_cep(value: &str) -> String {
	let digits = digits_only(value);

	match digits.len() {
		0..=5 => digits,
		6..=8 => format!("{}-{}", &digits[..5], &digits[5..]),
		_ => format!("{}-{}", &digits[..5], &digits[5..8]),
	}
}
