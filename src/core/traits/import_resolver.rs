/// Port for checking that a dotted path names something importable.
///
/// Rust has no runtime import machinery, so callers register what their
/// application can load (see `ImportRegistry`) or supply their own lookup.
pub trait ImportResolver: Send + Sync {
    /// `Ok(())` if `path` resolves, otherwise a human-readable reason.
    fn resolve(&self, path: &str) -> Result<(), String>;
}
