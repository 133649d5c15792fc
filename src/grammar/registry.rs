use std::collections::HashMap;

/// Opaque category tag for a graph node.
///
/// Kinds determine which productions can match a node. A kind is either
/// terminal (a concrete pipeline step) or non-terminal (a placeholder the
/// grammar still has to expand); the distinction lives in the grammar's
/// non-terminal set, not in the tag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(u32);

/// Mints `Kind` tags from symbolic names.
///
/// One tag is created per distinct name and reused on every later lookup, so
/// repeated references to the same name compare equal. The registry is
/// append-only and owned by whoever builds the grammar, so two grammars with
/// separate registries are fully isolated from each other.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    by_name: HashMap<String, Kind>,
    names: Vec<String>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the kind registered under `name`, minting a fresh tag on first use.
    pub fn resolve(&mut self, name: &str) -> Kind {
        if let Some(&kind) = self.by_name.get(name) {
            return kind;
        }

        let kind = Kind(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), kind);
        kind
    }

    /// Look up a name without minting a new tag.
    pub fn get(&self, name: &str) -> Option<Kind> {
        self.by_name.get(name).copied()
    }

    /// Reverse lookup, mainly for diagnostics and logging.
    pub fn name(&self, kind: Kind) -> Option<&str> {
        self.names.get(kind.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_kind() {
        let mut registry = KindRegistry::new();
        let a1 = registry.resolve("Vectorizer");
        let b = registry.resolve("Classifier");
        let a2 = registry.resolve("Vectorizer");

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut registry = KindRegistry::new();
        let kind = registry.resolve("Tokenizer");

        assert_eq!(registry.name(kind), Some("Tokenizer"));
        assert_eq!(registry.get("Tokenizer"), Some(kind));
        assert_eq!(registry.get("Missing"), None);
    }

    #[test]
    fn test_registries_are_isolated() {
        let mut r1 = KindRegistry::new();
        let mut r2 = KindRegistry::new();
        r1.resolve("A");
        let b = r2.resolve("B");

        // Same numeric tag space, different sessions
        assert_eq!(r2.name(b), Some("B"));
        assert_eq!(r1.get("B"), None);
    }
}
