use rand::RngCore;
use rand::rngs::OsRng;
use tracing::error;
use uuid::Uuid;

use crate::errors::UtilError;

/// Generates a random 128-bit identifier in the `8-4-4-4-12` hex layout.
///
/// # Errors
///
/// Returns an error if the operating system randomness source fails.
pub fn new_identifier() -> Result<String, UtilError> {
    new_identifier_from(&mut OsRng)
}

/// Same as [`new_identifier`], drawing bytes from `rng`.
///
/// No version or variant bits are set: all 128 bits come from the source.
///
/// # Errors
///
/// Returns an error if `rng` cannot fill the buffer.
pub fn new_identifier_from<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, UtilError> {
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes).map_err(|e| {
        error!("Failed to read random bytes: {}", e);
        UtilError::RandomnessError(e.to_string())
    })?;
    Ok(Uuid::from_bytes(bytes).hyphenated().to_string())
}
