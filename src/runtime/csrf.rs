//! Anti-forgery token capability.
//!
//! Mutate requests carry the session's CSRF token. Where that token comes from
//! is injected through [`CsrfTokenSource`] so the coordinator can run against a
//! fixed token in tests and against the browser's cookie string in a host.

/// Obtains the current anti-forgery token for outbound mutate calls.
pub trait CsrfTokenSource {
    /// `None` when no token is available; the request is still sent and the
    /// server decides.
    fn token(&self) -> Option<String>;
}

/// Reads the token from a `Cookie`-header style string.
#[derive(Debug, Clone)]
pub struct CookieJar {
    cookies: String,
    name: String,
}

impl CookieJar {
    /// `cookies` is the raw `name=value; other=value` string, `name` the cookie
    /// holding the token (normally `csrftoken`).
    pub fn new(cookies: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            name: name.into(),
        }
    }

    /// Replaces the cookie string, e.g. after the session rotated the token.
    pub fn update(&mut self, cookies: impl Into<String>) {
        self.cookies = cookies.into();
    }

    /// Looks up a cookie by name and percent-decodes its value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies
            .split(';')
            .map(str::trim)
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| {
                urlencoding::decode(value)
                    .map_or_else(|_| value.to_string(), |decoded| decoded.into_owned())
            })
    }
}

impl CsrfTokenSource for CookieJar {
    fn token(&self) -> Option<String> {
        self.get(&self.name).filter(|t| !t.is_empty())
    }
}

/// A token fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl CsrfTokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}
