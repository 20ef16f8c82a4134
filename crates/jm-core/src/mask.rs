//! Length-preserving token masking.

/// Default mask symbol.
pub const DEFAULT_MASK: char = '*';

/// Mask a matched token, keeping its first and (for three or more chars)
/// last character.
///
/// Each replaced char becomes as many mask symbols as its UTF-16 width, so the
/// UTF-16 length of the output always equals the input's. `mask` must be a
/// BMP character.
pub fn mask_token(token: &str, mask: char) -> String {
    let count = token.chars().count();
    if count <= 1 {
        return token.to_string();
    }

    let mut out = String::with_capacity(token.len());
    let last = count - 1;
    for (i, c) in token.chars().enumerate() {
        let keep = i == 0 || (count >= 3 && i == last);
        if keep {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push(mask);
            }
        }
    }
    out
}

/// Whether `c` can serve as a mask symbol.
///
/// A word character would let masked output form new words, and a non-BMP
/// char would break UTF-16 length preservation.
pub fn is_valid_mask(c: char) -> bool {
    c.len_utf16() == 1 && !c.is_alphanumeric() && c != '_' && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn utf16_len(s: &str) -> usize {
        s.encode_utf16().count()
    }

    #[test]
    fn test_short_tokens() {
        assert_eq!(mask_token("", '*'), "");
        assert_eq!(mask_token("a", '*'), "a");
        assert_eq!(mask_token("ab", '*'), "a*");
    }

    #[test]
    fn test_long_tokens() {
        assert_eq!(mask_token("job", '*'), "j*b");
        assert_eq!(mask_token("reference", '*'), "r*******e");
        assert_eq!(mask_token("Resume", '#'), "R####e");
    }

    #[test]
    fn test_non_ascii_token_keeps_utf16_length() {
        let token = "K\u{212A}b"; // Kelvin sign folds to 'k'
        let masked = mask_token(token, '*');
        assert_eq!(masked, "K*b");
        assert_eq!(utf16_len(&masked), utf16_len(token));
    }

    #[test]
    fn test_valid_masks() {
        assert!(is_valid_mask('*'));
        assert!(is_valid_mask('#'));
        assert!(is_valid_mask('\u{2022}'));
        assert!(!is_valid_mask('x'));
        assert!(!is_valid_mask('_'));
        assert!(!is_valid_mask('7'));
        assert!(!is_valid_mask(' '));
        assert!(!is_valid_mask('\u{1F600}'));
    }

    proptest! {
        /// Masking never changes the UTF-16 length of a token.
        #[test]
        fn prop_mask_preserves_length(token in "\\PC{0,24}") {
            let masked = mask_token(&token, '*');
            prop_assert_eq!(utf16_len(&masked), utf16_len(&token));
        }

        /// The first character always survives masking.
        #[test]
        fn prop_mask_keeps_first_char(token in "[a-zA-Z]{1,24}") {
            let masked = mask_token(&token, '*');
            prop_assert_eq!(masked.chars().next(), token.chars().next());
        }

        /// Tokens of three or more chars keep their last char too.
        #[test]
        fn prop_mask_keeps_last_char(token in "[a-zA-Z]{3,24}") {
            let masked = mask_token(&token, '*');
            prop_assert_eq!(masked.chars().last(), token.chars().last());
            prop_assert_eq!(masked.matches('*').count(), token.len() - 2);
        }
    }
}
