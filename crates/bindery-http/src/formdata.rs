//! Submitted form data.
//!
//! [`FormData`] holds the raw key/value pairs of an
//! `application/x-www-form-urlencoded` body (or query string). A key may
//! appear multiple times; [`get`](FormData::get) returns the last value and
//! [`get_list`](FormData::get_list) all of them.

use std::collections::HashMap;

/// Raw submitted form data: a multi-valued string dictionary.
///
/// # Examples
///
/// ```
/// use bindery_http::FormData;
///
/// let data = FormData::parse("genre=scifi&genre=fantasy&title=Dune");
/// assert_eq!(data.get("title"), Some("Dune"));
/// assert_eq!(data.get("genre"), Some("fantasy"));
/// assert_eq!(
///     data.get_list("genre"),
///     &["scifi".to_string(), "fantasy".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormData {
    inner: HashMap<String, Vec<String>>,
}

impl FormData {
    /// Creates an empty `FormData`.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Parses a form-urlencoded string (`"key1=val1&key2=val2"`).
    ///
    /// Handles percent-encoding, treats `+` as a space, and keeps repeated
    /// keys as multiple values.
    pub fn parse(encoded: &str) -> Self {
        let mut data = Self::new();
        for pair in encoded.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq| (&pair[..eq], &pair[eq + 1..]));
            data.append(percent_decode(key), percent_decode(value));
        }
        data
    }

    /// Builds a `FormData` from literal pairs; handy in tests.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut data = Self::new();
        for (key, value) in pairs {
            data.append((*key).to_string(), (*value).to_string());
        }
        data
    }

    /// Returns the **last** value submitted for `key`, or `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value submitted for `key`, in submission order.
    /// Missing keys yield an empty slice.
    pub fn get_list(&self, key: &str) -> &[String] {
        self.inner.get(key).map_or(&[], Vec::as_slice)
    }

    /// Sets a single value for `key`, replacing any existing values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Appends a value to the list for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Returns `true` if `key` was submitted at all.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over the submitted keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inner.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Encodes the data back into a form-urlencoded string with sorted
    /// pairs, so the output is deterministic.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();
        for (key, values) in &self.inner {
            for value in values {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }
        parts.sort();
        parts.join("&")
    }
}

/// Decodes a percent-encoded form component.
fn percent_decode(input: &str) -> String {
    // + means space in form encoding, then percent sequences are decoded
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a form component.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
