/// Config for a definition
/// ## Fields
/// - `cache_provides`:
///   If `true`, the definition is shared: the instance is constructed once per container, cached and reused.
///   If `false`, the definition is unshared and a fresh instance is constructed per request.
///
///   This does **not** affect the dependencies of the instance.
///   Only the final result is cached if caching is applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cache_provides: bool,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn unshared() -> Self {
        Self { cache_provides: false }
    }

    /// Combines two configs, an unshared side wins
    #[inline]
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            cache_provides: self.cache_provides && other.cache_provides,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { cache_provides: true }
    }
}
