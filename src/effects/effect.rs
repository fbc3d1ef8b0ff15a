/// Named, direction-aware discrete action such as `soda:phase=3` or `finale:clear-text`.
///
/// The token is opaque to the engine; executors conventionally split it into a
/// `namespace:action` pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SideEffect(pub String);

impl SideEffect {
    /// Create an effect from its token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Full token.
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Part before the first `:` (the whole token when there is none).
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(ns, _)| ns)
    }

    /// Part after the first `:`, if any.
    pub fn action(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, action)| action)
    }

    /// Value of a `key=value` action, when the action has that shape and the key matches.
    pub fn arg(&self, key: &str) -> Option<&str> {
        let (k, v) = self.action()?.split_once('=')?;
        (k == key).then_some(v)
    }
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect.rs"]
mod tests;
