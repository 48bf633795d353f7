/// Port for reading process-style environment variables.
///
/// Kept behind a trait so definitions can be built against a fixed map in
/// tests without touching the real process environment.
pub trait Environ: Send + Sync {
    /// Value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}
