use alloc::vec::Vec;

use crate::{alias::Alias, config::Config, constraint::Constraints, tag::Tag, tag::Tags};

/// Metadata attached to a registration
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) aliases: Vec<Alias>,
    pub(crate) tags: Tags,
    pub(crate) constraints: Constraints,
    pub(crate) config: Config,
}

impl Options {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally indexes the definition under an interface
    #[must_use]
    pub fn alias(mut self, alias: Alias) -> Self {
        self.aliases.push(alias);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = self.constraints.merge(constraints);
        self
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Constructs a fresh instance per request instead of caching it
    #[must_use]
    pub fn unshared(self) -> Self {
        self.config(Config::unshared())
    }

    /// Combines an option group into these options.
    /// Aliases and tags are appended, constraints of `other` win, an unshared side wins.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.aliases.extend(other.aliases);
        self.tags.extend(other.tags);
        self.constraints = self.constraints.merge(other.constraints);
        self.config = self.config.merge(other.config);
        self
    }
}
