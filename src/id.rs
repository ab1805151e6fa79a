use rand::Rng;

/// Length of every identifier produced by [`new_id`].
pub const ID_LEN: usize = 32;

/// Generates an opaque 32-character lowercase hexadecimal identifier.
///
/// Drawn from the thread-local, non-cryptographic generator. Collisions are
/// treated as impossible for session-sized graphs.
pub fn new_id() -> String {
    let bits: u128 = rand::rng().random();
    format!("{:032x}", bits)
}
