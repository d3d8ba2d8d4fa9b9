//! Class access code generation.
//!
//! Access codes are the short strings teachers hand out so students can
//! join a class. Uniqueness is enforced at the database level; callers
//! retry on collision.

use rand::Rng;

/// Length of a class access code.
pub const ACCESS_CODE_LEN: usize = 6;

/// Characters used in access codes. Uppercase letters and digits,
/// minus the lookalikes 0/O and 1/I that get misread off a whiteboard.
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random class access code.
///
/// Codes are not guaranteed unique; the caller checks the store and
/// regenerates on collision.
#[must_use]
pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}
