//! Random identifier generation.

use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LENGTH: usize = 9;

/// A 9-character lowercase base-36 token, used for tenant, section,
/// discount and activity ids.
#[must_use]
pub fn short_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_ALPHABET.len());
            char::from(TOKEN_ALPHABET.get(idx).copied().unwrap_or(b'0'))
        })
        .collect()
}

/// A string of `len` random decimal digits.
#[must_use]
pub fn digits(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_token_shape() {
        let token = short_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_digits_shape() {
        let value = digits(8);
        assert_eq!(value.len(), 8);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }
}
