use crate::constants::TRANSIENT_OVERLOAD_PATTERNS;

/// Indica si un mensaje de error corresponde a una sobrecarga transitoria del
/// proveedor (comparación insensible a mayúsculas).
pub fn is_transient_overload(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_OVERLOAD_PATTERNS.iter().any(|p| lowered.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_known_patterns() {
        assert!(is_transient_overload("The Model Is Overloaded, retry"));
        assert!(is_transient_overload("HTTP 429: Rate limit reached for requests"));
        assert!(is_transient_overload("service temporarily unavailable"));
        assert!(is_transient_overload("Please try again later."));
    }

    #[test]
    fn other_messages_are_not_transient() {
        assert!(!is_transient_overload("invalid api key"));
        assert!(!is_transient_overload("HTTP 400: bad request"));
        assert!(!is_transient_overload(""));
    }
}
