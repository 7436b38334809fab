/// Composite lookup key of an SCN subscription: subscriber followed by URL.
///
/// There is no separator, so `"ab" + "c"` and `"a" + "bc"` produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberUrl(String);

impl SubscriberUrl {
    pub fn new(subscriber: &str, url: &str) -> Self {
        let mut key = String::with_capacity(subscriber.len() + url.len());
        key.push_str(subscriber);
        key.push_str(url);
        Self(key)
    }
}

impl AsRef<str> for SubscriberUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SubscriberUrl {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SubscriberUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
