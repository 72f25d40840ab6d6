//! CSRF state values for OAuth flows.

use rand::Rng;

/// Number of random bytes in a generated state value.
const STATE_BYTES: usize = 16;

/// Generate a cryptographically random state token, hex encoded.
pub fn generate_state() -> String {
    let random_bytes: [u8; STATE_BYTES] = rand::thread_rng().gen();
    hex::encode(random_bytes)
}

/// Compare a received state value against the expected one.
///
/// An empty expected value never matches.
pub fn check_state(expected: &str, received: &str) -> bool {
    !expected.is_empty() && expected == received
}
