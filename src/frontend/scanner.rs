//! Number scanner
//!
//! Classifies a run of characters as a well-formed numeric literal or
//! reports why it is not one.

use super::ParseError;

/// Scan the longest valid number token at the start of `window`.
///
/// Returns `Ok(None)` when the window does not start with an ASCII digit,
/// `Ok(Some(len))` with the token length otherwise (`len >= 1`). A space,
/// any character that cannot be part of a number, or the end of the window
/// terminates the token.
///
/// Rules:
/// - a leading `0` must be followed by a decimal separator or end the token
/// - at most one decimal separator (`.` or `,`)
/// - a separator cannot be the last character of the token
pub fn scan_number(window: &str) -> Result<Option<usize>, ParseError> {
    let bytes = window.as_bytes();
    if bytes.is_empty() {
        return Err(ParseError::EmptySpan);
    }
    if !bytes[0].is_ascii_digit() {
        return Ok(None);
    }

    if bytes[0] == b'0' {
        if let Some(next) = bytes.get(1) {
            if next.is_ascii_digit() {
                return Err(ParseError::IncorrectNumber(numeric_run(window)));
            }
        }
    }

    let mut found_separator = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() {
            i += 1;
            continue;
        }
        if is_separator(b) {
            if found_separator {
                return Err(ParseError::DoubleSeparator(window[..=i].to_string()));
            }
            // the separator must be followed by a digit (or by a second
            // separator, which the next round reports as a double separator)
            match bytes.get(i + 1) {
                Some(next) if next.is_ascii_digit() || is_separator(*next) => {}
                _ => return Err(ParseError::UnexpectedEndOfNumber(window[..=i].to_string())),
            }
            found_separator = true;
            i += 1;
            continue;
        }
        return Ok(Some(i));
    }

    Ok(Some(bytes.len()))
}

#[inline]
fn is_separator(b: u8) -> bool {
    b == b'.' || b == b','
}

/// Longest digit/separator prefix, for error messages.
fn numeric_run(window: &str) -> String {
    window
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_integers() {
        assert_eq!(scan_number("42"), Ok(Some(2)));
        assert_eq!(scan_number("42 + 1"), Ok(Some(2)));
        assert_eq!(scan_number("7)"), Ok(Some(1)));
    }

    #[test]
    fn scans_decimal_numbers() {
        assert_eq!(scan_number("12.5"), Ok(Some(4)));
        assert_eq!(scan_number("12,5"), Ok(Some(4)));
        assert_eq!(scan_number("0.125+1"), Ok(Some(5)));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(scan_number("sin(1)"), Ok(None));
        assert_eq!(scan_number("+1"), Ok(None));
    }

    #[test]
    fn empty_window_is_an_error() {
        assert_eq!(scan_number(""), Err(ParseError::EmptySpan));
    }

    #[test]
    fn leading_zero_must_precede_a_separator() {
        assert_eq!(scan_number("0"), Ok(Some(1)));
        assert_eq!(scan_number("0 "), Ok(Some(1)));
        assert_eq!(scan_number("0.5"), Ok(Some(3)));
        assert_eq!(
            scan_number("001254.5"),
            Err(ParseError::IncorrectNumber("001254.5".into()))
        );
        assert_eq!(
            scan_number("01"),
            Err(ParseError::IncorrectNumber("01".into()))
        );
    }

    #[test]
    fn double_separator_names_the_prefix() {
        assert_eq!(
            scan_number("12.54.5"),
            Err(ParseError::DoubleSeparator("12.54.".into()))
        );
        assert_eq!(
            scan_number("12..5"),
            Err(ParseError::DoubleSeparator("12..".into()))
        );
    }

    #[test]
    fn trailing_separator_names_the_token() {
        assert_eq!(
            scan_number("12."),
            Err(ParseError::UnexpectedEndOfNumber("12.".into()))
        );
        assert_eq!(
            scan_number("12. + 1"),
            Err(ParseError::UnexpectedEndOfNumber("12.".into()))
        );
    }
}
