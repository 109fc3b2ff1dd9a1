use std::sync::{Mutex, MutexGuard};

/// Serializes tests that read or write `XDG_CONFIG_HOME` and friends.
static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    // A panicking test must not cascade into every later env test.
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
