//! Webhook secret-token verification.
//!
//! When a secret token is passed to `setWebhook`, Telegram sends it back on
//! every delivery in the `X-Telegram-Bot-Api-Secret-Token` header.
//! Reference: https://core.telegram.org/bots/api#setwebhook

use tracing::warn;

/// Header Telegram uses to echo the webhook secret token.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Verify the secret token presented with a webhook delivery.
///
/// # Arguments
///
/// * `expected` - The token registered with `setWebhook`
/// * `provided` - The header value, if the request carried one
///
/// # Returns
///
/// `true` only if a token was provided and matches `expected`.
pub fn verify_secret_token(expected: &str, provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        warn!("webhook_secret_missing");
        return false;
    };

    let valid = constant_time_compare(expected, provided);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = provided.len(),
            "webhook_secret_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
