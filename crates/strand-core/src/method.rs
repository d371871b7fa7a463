//! HTTP method enumeration.

/// HTTP request method.
///
/// A closed enumeration of the nine methods the framework routes on.
/// Verb-specific registration entry points are thin wrappers over a single
/// parameterized registration operation taking one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Number of method variants, used to size per-method route lists.
    pub const COUNT: usize = 9;

    /// All method variants in a stable order.
    pub const ALL: [Method; Method::COUNT] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    /// Parse a method from its uppercase wire form.
    ///
    /// Returns `None` for anything that is not one of the nine supported
    /// methods; callers treat an unknown method as a non-match.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONNECT" => Some(Self::Connect),
            "DELETE" => Some(Self::Delete),
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "PATCH" => Some(Self::Patch),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// The wire form of this method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }

    /// Dense index of this method, stable across [`Method::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Connect => 0,
            Self::Delete => 1,
            Self::Get => 2,
            Self::Head => 3,
            Self::Options => 4,
            Self::Patch => 5,
            Self::Post => 6,
            Self::Put => 7,
            Self::Trace => 8,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_all_methods() {
        for method in Method::ALL {
            assert_eq!(Method::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_lowercase() {
        assert_eq!(Method::parse("BREW"), None);
        assert_eq!(Method::parse("get"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn indices_are_dense_and_unique() {
        for (position, method) in Method::ALL.iter().enumerate() {
            assert_eq!(method.index(), position);
        }
    }
}
