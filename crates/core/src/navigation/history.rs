//! Session history and its mapping onto addressable URLs.
//!
//! A history is an ordered list of visited [`Location`]s and a cursor
//! pointing at the current one. Pushing truncates every entry after the
//! cursor, exactly like a browser tab does after the user goes back and then
//! follows a new link.
//!
//! The [`HistoryMode`] decides how a location shows up in the host's URL:
//!
//! ```text
//! Web:  <base>/setting_window?tab=1#top
//! Hash: <base>/#/setting_window?tab=1
//! ```
//!
//! In hash mode the URL fragment is taken by the location itself, so the
//! location's own fragment is not part of the address.

use super::location::Location;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// How locations are reflected in the host's addressable URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryMode {
    /// The location is the URL path itself, with no fragment indirection.
    #[default]
    Web,
    /// The location lives in the URL fragment, for hosts that cannot serve
    /// deep links.
    Hash,
}

/// Storage for visited locations.
///
/// The controller owns its history through this trait so hosts can plug in
/// their own location mechanism.
pub trait History {
    /// The current entry.
    fn location(&self) -> &Location;

    /// Appends `location` after the current entry, discarding forward entries.
    fn push(&mut self, location: Location);

    /// Overwrites the current entry.
    fn replace(&mut self, location: Location);

    /// Moves the cursor by `delta` entries.
    ///
    /// Returns the new current entry, or `None` if the target is out of range,
    /// in which case the cursor does not move.
    fn go(&mut self, delta: isize) -> Option<&Location>;

    /// The URL under which `location` is addressable.
    fn href(&self, location: &Location) -> String;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Index of the current entry.
    fn position(&self) -> usize;

    /// The entry at `index`, if any.
    fn entry(&self, index: usize) -> Option<&Location>;

    /// Offset from the current entry to the nearest other entry equal to
    /// `location`, preferring the backward direction on ties.
    fn offset_of(&self, location: &Location) -> Option<isize> {
        let position = self.position();
        (1..self.len()).find_map(|distance| {
            let backward = position
                .checked_sub(distance)
                .and_then(|index| self.entry(index))
                .filter(|entry| *entry == location)
                .map(|_| -(distance as isize));
            let forward = self
                .entry(position + distance)
                .filter(|entry| *entry == location)
                .map(|_| distance as isize);
            backward.or(forward)
        })
    }
}

/// Normalizes a history base so it can be prepended to a path.
///
/// An empty base and `/` both mean "no base". Otherwise the result starts
/// with `/` and has no trailing `/`.
pub fn normalize_base(base: &str) -> Result<String, ConfigurationError> {
    let trimmed = base.trim();
    if trimmed.contains(['#', '?']) || trimmed.contains(char::is_whitespace) {
        return Err(ConfigurationError::InvalidBase(base.to_string()));
    }

    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() {
        return Ok(String::new());
    }

    if stripped.starts_with('/') {
        Ok(stripped.to_string())
    } else {
        Ok(format!("/{}", stripped))
    }
}

/// In-process session history.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    mode: HistoryMode,
    base: String,
    entries: Vec<Location>,
    position: usize,
}

impl SessionHistory {
    /// Creates a history whose only entry is `initial`.
    pub fn new(
        mode: HistoryMode,
        base: &str,
        initial: Location,
    ) -> Result<SessionHistory, ConfigurationError> {
        Ok(SessionHistory {
            mode,
            base: normalize_base(base)?,
            entries: vec![initial],
            position: 0,
        })
    }

    /// Creates a history from the location the host reports at startup.
    ///
    /// In web mode the base is stripped from the host path. A path outside
    /// the base is kept as is. In hash mode the in-app location is read from
    /// the fragment, and an empty fragment means `/`.
    pub fn from_host_location(
        mode: HistoryMode,
        base: &str,
        host: &Location,
    ) -> Result<SessionHistory, ConfigurationError> {
        let base = normalize_base(base)?;
        let initial = match mode {
            HistoryMode::Web => strip_base(&base, host),
            HistoryMode::Hash => location_from_fragment(host),
        };

        tracing::debug!(?mode, base = %base, host = %host, initial = %initial, "Created session history");

        Ok(SessionHistory {
            mode,
            base,
            entries: vec![initial],
            position: 0,
        })
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }
}

impl History for SessionHistory {
    fn location(&self) -> &Location {
        &self.entries[self.position]
    }

    fn push(&mut self, location: Location) {
        self.entries.truncate(self.position + 1);
        self.entries.push(location);
        self.position = self.entries.len() - 1;
    }

    fn replace(&mut self, location: Location) {
        self.entries[self.position] = location;
    }

    fn go(&mut self, delta: isize) -> Option<&Location> {
        let target = self.position.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }

        self.position = target;
        Some(&self.entries[target])
    }

    fn href(&self, location: &Location) -> String {
        match self.mode {
            HistoryMode::Web => format!("{}{}", self.base, location),
            HistoryMode::Hash => format!("{}/#{}", self.base, location.without_fragment()),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn entry(&self, index: usize) -> Option<&Location> {
        self.entries.get(index)
    }
}

fn strip_base(base: &str, host: &Location) -> Location {
    if base.is_empty() {
        return host.clone();
    }

    match host.path().strip_prefix(base) {
        Some("") => host.with_path("/"),
        Some(rest) if rest.starts_with('/') => host.with_path(rest),
        _ => host.clone(),
    }
}

fn location_from_fragment(host: &Location) -> Location {
    match host.fragment() {
        None => Location::root(),
        Some(fragment) if fragment.starts_with('/') => {
            Location::parse(fragment).unwrap_or_else(|_| Location::root())
        }
        Some(fragment) => {
            Location::parse(&format!("/{}", fragment)).unwrap_or_else(|_| Location::root())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_history() -> SessionHistory {
        SessionHistory::new(HistoryMode::Web, "/", Location::root()).unwrap()
    }

    #[test]
    fn normalize_base_variants() {
        assert_eq!(normalize_base("").unwrap(), "");
        assert_eq!(normalize_base("/").unwrap(), "");
        assert_eq!(normalize_base("app").unwrap(), "/app");
        assert_eq!(normalize_base("/app/").unwrap(), "/app");
        assert!(matches!(
            normalize_base("/app#x"),
            Err(ConfigurationError::InvalidBase(_))
        ));
        assert!(normalize_base("/my app").is_err());
    }

    #[test]
    fn push_then_back_and_forward() {
        let mut history = web_history();
        history.push(Location::new("/setting_window"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.location().path(), "/setting_window");

        assert_eq!(history.go(-1).map(Location::path), Some("/"));
        assert_eq!(history.go(1).map(Location::path), Some("/setting_window"));
    }

    #[test]
    fn go_out_of_range_keeps_position() {
        let mut history = web_history();
        assert!(history.go(-1).is_none());
        assert!(history.go(1).is_none());
        assert_eq!(history.position(), 0);
        assert_eq!(history.go(0).map(Location::path), Some("/"));
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = web_history();
        history.push(Location::new("/a"));
        history.push(Location::new("/b"));
        history.go(-2);
        history.push(Location::new("/c"));

        let paths: Vec<_> = history.entries().iter().map(Location::path).collect();
        assert_eq!(paths, vec!["/", "/c"]);
        assert!(history.go(1).is_none());
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let mut history = web_history();
        history.push(Location::new("/a"));
        history.replace(Location::new("/b"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.location().path(), "/b");
    }

    #[test]
    fn web_href_has_no_fragment_indirection() {
        let history = SessionHistory::new(HistoryMode::Web, "/app/", Location::root()).unwrap();
        assert_eq!(
            history.href(&Location::new("/setting_window")),
            "/app/setting_window"
        );

        let history = web_history();
        assert_eq!(
            history.href(&Location::parse("/setting_window?tab=1").unwrap()),
            "/setting_window?tab=1"
        );
    }

    #[test]
    fn hash_href_puts_location_behind_fragment() {
        let history = SessionHistory::new(HistoryMode::Hash, "", Location::root()).unwrap();
        assert_eq!(
            history.href(&Location::new("/setting_window")),
            "/#/setting_window"
        );
    }

    #[test]
    fn hash_href_drops_location_fragment() {
        let history = SessionHistory::new(HistoryMode::Hash, "/app", Location::root()).unwrap();
        let href = history.href(&Location::parse("/setting_window?tab=1#top").unwrap());

        assert_eq!(href, "/app/#/setting_window?tab=1");
        assert_eq!(href.matches('#').count(), 1);
    }

    #[test]
    fn offset_of_finds_nearest_matching_entry() {
        let mut history = web_history();
        history.push(Location::new("/setting_window"));
        history.push(Location::new("/"));
        history.go(-1);

        assert_eq!(history.offset_of(&Location::root()), Some(-1));
        assert_eq!(history.offset_of(&Location::new("/setting_window")), None);
        assert_eq!(history.offset_of(&Location::new("/elsewhere")), None);

        history.go(-1);
        assert_eq!(history.offset_of(&Location::new("/setting_window")), Some(1));
        assert_eq!(history.offset_of(&Location::root()), Some(2));
    }

    #[test]
    fn web_host_location_strips_base() {
        let host = Location::new("/app/setting_window");
        let history = SessionHistory::from_host_location(HistoryMode::Web, "/app", &host).unwrap();
        assert_eq!(history.location().path(), "/setting_window");
        assert_eq!(history.mode(), HistoryMode::Web);
        assert_eq!(history.base(), "/app");

        let host = Location::new("/app");
        let history = SessionHistory::from_host_location(HistoryMode::Web, "/app", &host).unwrap();
        assert_eq!(history.location().path(), "/");

        let host = Location::new("/application");
        let history = SessionHistory::from_host_location(HistoryMode::Web, "/app", &host).unwrap();
        assert_eq!(history.location().path(), "/application");
    }

    #[test]
    fn hash_host_location_reads_fragment() {
        let host = Location::parse("/index.html#/setting_window").unwrap();
        let history = SessionHistory::from_host_location(HistoryMode::Hash, "", &host).unwrap();
        assert_eq!(history.location().path(), "/setting_window");
        assert_eq!(history.mode(), HistoryMode::Hash);
        assert_eq!(history.base(), "");

        let host = Location::new("/index.html");
        let history = SessionHistory::from_host_location(HistoryMode::Hash, "", &host).unwrap();
        assert_eq!(history.location().path(), "/");
    }
}
