use rand::{Rng as _, distributions::Alphanumeric, thread_rng};

const APP_NAME_PREFIX: &str = "pat";
const APP_NAME_SUFFIX_LEN: usize = 16;

/// Fresh app name for one push; random so concurrent runs never collide.
#[must_use]
pub fn unique_app_name() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(APP_NAME_SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{APP_NAME_PREFIX}-{suffix}")
}
