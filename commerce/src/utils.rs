use base64::{prelude::BASE64_URL_SAFE, Engine};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128,
};
use std::sync::{Mutex, OnceLock};
use ulid::{Generator, Ulid};

/// Stable user id for a user name, so uniqueness of names is uniqueness of
/// the table's hash key.
pub fn create_userid(username: &str) -> String {
    let mut hasher = Shake128::default();
    hasher.update(username.as_bytes());
    let mut reader = hasher.finalize_xof();
    let mut buf = [0u8; 12];
    reader.read(&mut buf);
    let suffix = BASE64_URL_SAFE.encode(buf);
    format!("user_{}", suffix)
}

/// Ulids that sort in creation order within this process, even inside one
/// millisecond.
pub fn next_id() -> Ulid {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();
    let mut generator = GENERATOR
        .get_or_init(|| Mutex::new(Generator::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    generator.generate().unwrap_or_else(|_| Ulid::new())
}
