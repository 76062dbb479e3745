/// Policy governing how many instances a producer yields.
///
/// - `Transient`: a fresh instance on every resolution. The default.
/// - `Singleton`: exactly one lazily-created instance shared for the life
///   of the owning container, constructed at most once even under
///   concurrent resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifetime {
    #[default]
    Transient,
    Singleton,
}

impl Lifetime {
    #[inline]
    #[must_use]
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Lifetime::Transient => "transient",
            Lifetime::Singleton => "singleton",
        }
    }
}
