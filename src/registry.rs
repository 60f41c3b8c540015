//! Named parser instances.
//!
//! Applications that configure a handful of parsers once and look them up
//! by name keep a [`ParserRegistry`] next to their other shared state.
//! Nothing in the crate holds one globally.

use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::Parser;

/// Lazily populated map from names to shared parsers.
///
/// # Example
/// ```
/// use litmark::{Options, Parser, ParserRegistry};
///
/// let registry = ParserRegistry::new();
/// let plain = registry.get_or_create("plain");
/// let liturgy = registry.get_or_insert_with("liturgy", || {
///     Parser::with_options(Options {
///         liturgical_elements: true,
///         ..Options::default()
///     })
/// });
/// assert!(!plain.options().liturgical_elements);
/// assert!(liturgy.options().liturgical_elements);
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ParserRegistry {
    parsers: Mutex<FxHashMap<String, Arc<Parser>>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parser registered under `name`, creating a default-configured
    /// one on first use.
    pub fn get_or_create(&self, name: &str) -> Arc<Parser> {
        self.get_or_insert_with(name, Parser::new)
    }

    /// The parser registered under `name`, building it with `make` on
    /// first use. Later calls return the stored instance and never run
    /// `make`.
    pub fn get_or_insert_with(&self, name: &str, make: impl FnOnce() -> Parser) -> Arc<Parser> {
        let mut parsers = self.parsers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parser) = parsers.get(name) {
            return Arc::clone(parser);
        }
        log::debug!("registering parser `{name}`");
        let parser = Arc::new(make());
        parsers.insert(name.to_string(), Arc::clone(&parser));
        parser
    }

    /// Forget the parser registered under `name`. Handles already given
    /// out stay valid.
    pub fn remove(&self, name: &str) -> Option<Arc<Parser>> {
        self.parsers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn len(&self) -> usize {
        self.parsers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    #[test]
    fn test_same_name_same_instance() {
        let registry = ParserRegistry::new();
        let first = registry.get_or_create("a");
        let second = registry.get_or_create("a");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builder_runs_once() {
        let registry = ParserRegistry::new();
        let mut calls = 0;
        for _ in 0..3 {
            registry.get_or_insert_with("safe", || {
                calls += 1;
                Parser::with_options(Options {
                    safe_mode: true,
                    ..Options::default()
                })
            });
        }
        assert_eq!(calls, 1);
        assert!(registry.get_or_create("safe").options().safe_mode);
    }

    #[test]
    fn test_remove() {
        let registry = ParserRegistry::new();
        assert!(registry.is_empty());
        let held = registry.get_or_create("x");
        assert!(registry.remove("x").is_some());
        assert!(registry.is_empty());
        assert_eq!(held.text("a"), "<p>a</p>");
        assert!(!Arc::ptr_eq(&held, &registry.get_or_create("x")));
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = Arc::new(ParserRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_create("shared").text("*x*"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok().as_deref(), Some("<p><em>x</em></p>"));
        }
        assert_eq!(registry.len(), 1);
    }
}
