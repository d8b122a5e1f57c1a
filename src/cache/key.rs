use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::ArcStr;

/// Canonical identity of a REST request: endpoint path plus query.
///
/// Parameters are sorted by name, then value, and form-url-encoded, so
/// logically identical requests map to the same key whatever order their
/// parameters were given in. Rendered as `path` or `path?k1=v1&k2=v2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(ArcStr);

impl RequestKey {
    pub fn new<I, K, V>(path: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect();
        params.sort();

        let path = path.trim_matches('/');
        if params.is_empty() {
            return Self(ArcStr::from(path));
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        Self(ArcStr::from(format!("{path}?{query}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The endpoint path, without the query.
    pub fn path(&self) -> &str {
        self.0.split_once('?').map_or(&*self.0, |(path, _)| path)
    }
}

impl Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
