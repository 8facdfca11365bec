use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use url::form_urlencoded;

use crate::domain::ports::outbound::{VariablePublisher, VariableUpdate};

type Params = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct Inner {
    params: Params,
    /// Earlier address states; the current one is `params`.
    history: Vec<Params>,
}

/// Dashboard address state holding `var-<name>` query parameters.
///
/// Stands in for the host's location service.
#[derive(Debug, Default)]
pub struct UrlState {
    inner: RwLock<Inner>,
}

impl UrlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing parameters, e.g. `[("from", "now-1h")]`.
    pub fn with_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: RwLock::new(Inner {
                params,
                history: Vec::new(),
            }),
        }
    }

    /// Current value of dashboard variable `name`.
    pub fn variable(&self, name: &str) -> Option<String> {
        self.param(&format!("var-{name}"))
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.read(|inner| inner.params.get(key).cloned())
    }

    /// Number of earlier address states kept for back navigation.
    pub fn history_len(&self) -> usize {
        self.read(|inner| inner.history.len())
    }

    /// Current parameters rendered as a form-encoded `?a=1&b=2`.
    pub fn query_string(&self) -> String {
        self.read(|inner| {
            if inner.params.is_empty() {
                return String::new();
            }
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&inner.params)
                .finish();
            format!("?{query}")
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Inner) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }
}

impl VariablePublisher for UrlState {
    fn set_variable(&self, update: VariableUpdate) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if !update.replace_history {
            let snapshot = inner.params.clone();
            inner.history.push(snapshot);
        }
        if !update.merge {
            inner.params.clear();
        }
        inner.params.insert(update.param_name(), update.value);
    }
}
