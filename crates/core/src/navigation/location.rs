use crate::error::NavigationError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::str::FromStr;

/// Characters escaped when a path is written back into a URL.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A position inside the application: a decoded path with optional query
/// and fragment.
///
/// Only the path takes part in route matching. The query and fragment are
/// carried along so the history reflects exactly what was requested.
///
/// # Example
///
/// ```
/// use zerolaunch_core::navigation::Location;
///
/// let location: Location = "/setting_window?tab=general#paths".parse()?;
/// assert_eq!(location.path(), "/setting_window");
/// assert_eq!(location.query(), Some("tab=general"));
/// assert_eq!(location.fragment(), Some("paths"));
/// # Ok::<(), zerolaunch_core::NavigationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Location {
    /// Creates a location from an already decoded path.
    pub fn new(path: impl Into<String>) -> Location {
        Location {
            path: path.into(),
            query: None,
            fragment: None,
        }
    }

    pub fn root() -> Location {
        Location::new("/")
    }

    /// Parses an absolute in-app target such as `/setting_window?x=1#top`.
    ///
    /// The path is percent-decoded. Empty query and fragment parts are
    /// dropped, so `/a?#` equals `/a`.
    pub fn parse(input: &str) -> Result<Location, NavigationError> {
        let invalid = |reason| NavigationError::InvalidLocation {
            location: input.to_string(),
            reason,
        };

        if input.is_empty() {
            return Err(invalid("location is empty"));
        }
        if !input.starts_with('/') {
            return Err(invalid("location must start with '/'"));
        }

        let (rest, fragment) = split_once_opt(input, '#');
        let (raw_path, query) = split_once_opt(rest, '?');

        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| invalid("path is not valid UTF-8"))?
            .into_owned();

        Ok(Location {
            path,
            query: query.map(str::to_string),
            fragment: fragment.map(str::to_string),
        })
    }

    /// Reads the location out of a URL reported by the host.
    ///
    /// Absolute URLs (`http://localhost:1420/setting_window`) are parsed with
    /// their scheme and authority discarded. Anything relative is handed to
    /// [`Location::parse`].
    pub fn from_url(input: &str) -> Result<Location, NavigationError> {
        match url::Url::parse(input) {
            Ok(url) => {
                let path = percent_decode_str(url.path())
                    .decode_utf8()
                    .map_err(|_| NavigationError::InvalidLocation {
                        location: input.to_string(),
                        reason: "path is not valid UTF-8",
                    })?
                    .into_owned();
                let path = if path.is_empty() { "/".to_string() } else { path };

                Ok(Location {
                    path,
                    query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
                    fragment: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
                })
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => Location::parse(input),
            Err(_) => Err(NavigationError::InvalidLocation {
                location: input.to_string(),
                reason: "malformed URL",
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns a copy of this location with its path replaced.
    pub fn with_path(&self, path: impl Into<String>) -> Location {
        Location {
            path: path.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this location without its fragment.
    pub fn without_fragment(&self) -> Location {
        Location {
            fragment: None,
            ..self.clone()
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", utf8_percent_encode(&self.path, PATH))?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s)
    }
}

fn split_once_opt(input: &str, delimiter: char) -> (&str, Option<&str>) {
    match input.split_once(delimiter) {
        Some((head, tail)) if tail.is_empty() => (head, None),
        Some((head, tail)) => (head, Some(tail)),
        None => (input, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_query_and_fragment() {
        let location = Location::parse("/setting_window?tab=paths#top").unwrap();
        assert_eq!(location.path(), "/setting_window");
        assert_eq!(location.query(), Some("tab=paths"));
        assert_eq!(location.fragment(), Some("top"));
    }

    #[test]
    fn parse_question_mark_inside_fragment_is_not_a_query() {
        let location = Location::parse("/#a?b").unwrap();
        assert_eq!(location.path(), "/");
        assert_eq!(location.query(), None);
        assert_eq!(location.fragment(), Some("a?b"));
    }

    #[test]
    fn parse_drops_empty_query_and_fragment() {
        assert_eq!(Location::parse("/a?#").unwrap(), Location::new("/a"));
    }

    #[test]
    fn parse_decodes_percent_escapes() {
        let location = Location::parse("/setting%5Fwindow").unwrap();
        assert_eq!(location.path(), "/setting_window");
    }

    #[test]
    fn parse_rejects_relative_and_empty_targets() {
        assert!(matches!(
            Location::parse(""),
            Err(NavigationError::InvalidLocation { .. })
        ));
        assert!(matches!(
            Location::parse("setting_window"),
            Err(NavigationError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        assert!(Location::parse("/%FF").is_err());
    }

    #[test]
    fn from_url_discards_origin() {
        let location = Location::from_url("http://localhost:1420/setting_window").unwrap();
        assert_eq!(location, Location::new("/setting_window"));
    }

    #[test]
    fn from_url_bare_origin_is_root() {
        let location = Location::from_url("tauri://localhost").unwrap();
        assert_eq!(location.path(), "/");
    }

    #[test]
    fn from_url_accepts_relative_paths() {
        let location = Location::from_url("/setting_window#general").unwrap();
        assert_eq!(location.path(), "/setting_window");
        assert_eq!(location.fragment(), Some("general"));
    }

    #[test]
    fn without_fragment_keeps_path_and_query() {
        let location = Location::parse("/setting_window?tab=1#top").unwrap();
        assert_eq!(location.without_fragment().to_string(), "/setting_window?tab=1");
    }

    #[test]
    fn display_escapes_reserved_path_characters() {
        let location = Location::new("/a b#c");
        assert_eq!(location.to_string(), "/a%20b%23c");
        assert_eq!(Location::parse(&location.to_string()).unwrap(), location);
    }
}
