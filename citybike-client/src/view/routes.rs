//! Client-side routes.

use std::fmt;

use crate::domain::StationKey;

/// A screen reachable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Journeys,
    Stations,
    Station(StationKey),
    License,
    NotFound,
}

impl Route {
    /// Resolve a path. Unknown paths and malformed station ids go to
    /// [`Route::NotFound`]; the root lands on the journey list.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["journeys"] => Route::Journeys,
            ["stations"] => Route::Stations,
            ["stations", id] => StationKey::parse(id)
                .map(Route::Station)
                .unwrap_or(Route::NotFound),
            ["license"] => Route::License,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Journeys => "/journeys".to_string(),
            Route::Stations => "/stations".to_string(),
            Route::Station(key) => format!("/stations/{}", key),
            Route::License => "/license".to_string(),
            Route::NotFound => "/not-found".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_routes() {
        assert_eq!(Route::parse("/journeys"), Route::Journeys);
        assert_eq!(Route::parse("/stations"), Route::Stations);
        assert_eq!(Route::parse("/license"), Route::License);
        assert_eq!(
            Route::parse("/stations/42"),
            Route::Station(StationKey::new(42))
        );
    }

    #[test]
    fn root_lands_on_journeys() {
        assert_eq!(Route::parse("/"), Route::Journeys);
        assert_eq!(Route::parse(""), Route::Journeys);
    }

    #[test]
    fn trailing_slash_and_query() {
        assert_eq!(Route::parse("/stations/"), Route::Stations);
        assert_eq!(
            Route::parse("/stations/7/?tab=top5"),
            Route::Station(StationKey::new(7))
        );
    }

    #[test]
    fn bad_station_ids() {
        assert_eq!(Route::parse("/stations/abc"), Route::NotFound);
        assert_eq!(Route::parse("/stations/-1"), Route::NotFound);
        assert_eq!(Route::parse("/stations/1.5"), Route::NotFound);
        assert_eq!(Route::parse("/stations/99999999999"), Route::NotFound);
    }

    #[test]
    fn unknown_paths() {
        assert_eq!(Route::parse("/about"), Route::NotFound);
        assert_eq!(Route::parse("/stations/1/extra"), Route::NotFound);
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Journeys,
            Route::Stations,
            Route::Station(StationKey::new(3)),
            Route::License,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
