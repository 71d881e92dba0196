use std::collections::HashMap;

use crate::{
    error::{ErrorKind, PResult},
    syntax::fold_name,
};

/// Variable bindings keyed case-insensitively.
pub(crate) struct Environment {
    entries: HashMap<String, i64>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, k: &str) -> Option<i64> {
        self.entries.get(&fold_name(k)).copied()
    }

    pub fn insert(&mut self, k: &str, v: i64) {
        let _ = self.entries.insert(fold_name(k), v);
    }

    /// Arguments for a compiled expression, in `variables` order. Fails on the
    /// first name without a binding.
    pub fn bind<S: AsRef<str>>(&self, variables: &[S]) -> PResult<Vec<i64>> {
        variables
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id)
                    .ok_or_else(|| ErrorKind::UnboundVariable(id.to_string()))
            })
            .collect()
    }
}
