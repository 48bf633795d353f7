use crate::core::traits::environ::Environ;

/// Reads the real process environment.
///
/// Variables that are unset or not valid unicode read as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnviron;

impl Environ for ProcessEnviron {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
