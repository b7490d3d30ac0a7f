/// Placeholder shown wherever a secret would be printed. Its length is fixed
/// and does not depend on the secret.
pub const SECRET_MASK: &str = "*****";

/// Returns the fixed-length mask for a secret value.
pub fn mask_secret(_secret: &str) -> &'static str {
    SECRET_MASK
}
