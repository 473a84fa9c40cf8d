use anyhow::anyhow;
use std::fmt;

/// A named place the weather screen can point at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Short lookup key, e.g. "lake-louise".
    pub key: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone passed to the forecast endpoint.
    pub timezone: &'static str,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.name, self.latitude, self.longitude)
    }
}

pub const DEFAULT_LOCATION_KEY: &str = "lake-louise";

static LOCATIONS: &[Location] = &[
    Location {
        key: "lake-louise",
        name: "Lake Louise",
        latitude: 51.43,
        longitude: -116.18,
        timezone: "America/Edmonton",
    },
    Location {
        key: "banff",
        name: "Banff",
        latitude: 51.18,
        longitude: -115.57,
        timezone: "America/Edmonton",
    },
    Location {
        key: "calgary",
        name: "Calgary",
        latitude: 51.05,
        longitude: -114.07,
        timezone: "America/Edmonton",
    },
    Location {
        key: "vancouver",
        name: "Vancouver",
        latitude: 49.28,
        longitude: -123.12,
        timezone: "America/Vancouver",
    },
    Location {
        key: "toronto",
        name: "Toronto",
        latitude: 43.65,
        longitude: -79.38,
        timezone: "America/Toronto",
    },
    Location {
        key: "reykjavik",
        name: "Reykjavik",
        latitude: 64.15,
        longitude: -21.94,
        timezone: "Atlantic/Reykjavik",
    },
    Location {
        key: "tokyo",
        name: "Tokyo",
        latitude: 35.68,
        longitude: 139.69,
        timezone: "Asia/Tokyo",
    },
];

/// Every registered location, in display order.
pub fn all() -> &'static [Location] {
    LOCATIONS
}

pub fn default_location() -> &'static Location {
    &LOCATIONS[0]
}

/// Look a location up by key or display name, ignoring case.
pub fn find(key: &str) -> anyhow::Result<&'static Location> {
    let needle = key.trim();
    LOCATIONS
        .iter()
        .find(|loc| loc.key.eq_ignore_ascii_case(needle) || loc.name.eq_ignore_ascii_case(needle))
        .ok_or_else(|| {
            let keys: Vec<&str> = LOCATIONS.iter().map(|loc| loc.key).collect();
            anyhow!("Unknown location '{key}'. Supported locations: {}.", keys.join(", "))
        })
}
