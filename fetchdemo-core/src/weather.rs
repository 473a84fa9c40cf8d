//! Current-weather screen: Open-Meteo URL building, WMO code labels and the
//! card shown once a forecast payload arrives.

use chrono::NaiveDateTime;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{location::Location, model::FetchState, view::View};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";

/// Label and glyph for one WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmoInfo {
    pub label: &'static str,
    pub emoji: &'static str,
}

const fn info(label: &'static str, emoji: &'static str) -> WmoInfo {
    WmoInfo { label, emoji }
}

pub const UNKNOWN_CODE: WmoInfo = info("Unknown", "❓");

static WMO_CODES: &[(i64, WmoInfo)] = &[
    (0, info("Clear sky", "☀️")),
    (1, info("Mainly clear", "🌤️")),
    (2, info("Partly cloudy", "⛅")),
    (3, info("Overcast", "☁️")),
    (45, info("Fog", "🌫️")),
    (48, info("Rime fog", "🌫️")),
    (51, info("Light drizzle", "🌦️")),
    (53, info("Moderate drizzle", "🌦️")),
    (55, info("Dense drizzle", "🌧️")),
    (56, info("Light freezing drizzle", "🌧️❄️")),
    (57, info("Dense freezing drizzle", "🌧️❄️")),
    (61, info("Light rain", "🌧️")),
    (63, info("Moderate rain", "🌧️")),
    (65, info("Heavy rain", "🌧️")),
    (66, info("Light freezing rain", "🌧️❄️")),
    (67, info("Heavy freezing rain", "🌧️❄️")),
    (71, info("Light snow", "🌨️")),
    (73, info("Moderate snow", "🌨️")),
    (75, info("Heavy snow", "❄️")),
    (77, info("Snow grains", "❄️")),
    (80, info("Light rain showers", "🌦️")),
    (81, info("Moderate rain showers", "🌦️")),
    (82, info("Violent rain showers", "⛈️")),
    (85, info("Light snow showers", "🌨️")),
    (86, info("Heavy snow showers", "❄️")),
    (95, info("Thunderstorm", "⛈️")),
    (96, info("Thunderstorm w/ hail", "⛈️🧊")),
    (99, info("Severe thunder w/ hail", "⛈️🧊")),
];

/// Label and glyph for a code. Clear and partly clear skies get moon glyphs
/// at night; unknown codes fall back to [`UNKNOWN_CODE`].
pub fn describe(code: i64, is_day: bool) -> WmoInfo {
    let base = WMO_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(UNKNOWN_CODE, |(_, info)| *info);

    match (is_day, code) {
        (false, 0) => WmoInfo { emoji: "🌙", ..base },
        (false, 1 | 2) => WmoInfo { emoji: "🌙☁️", ..base },
        _ => base,
    }
}

/// 16-wind compass point for a bearing in degrees.
pub fn to_cardinal(degrees: f64) -> &'static str {
    const DIRS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let idx = (degrees.rem_euclid(360.0) / 22.5).round() as usize % DIRS.len();
    DIRS[idx]
}

/// Current-conditions URL for a location.
pub fn open_meteo_url(base_url: &str, location: &Location) -> anyhow::Result<String> {
    let endpoint = format!("{}/v1/forecast", base_url.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &endpoint,
        &[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("temperature_unit", "celsius".to_string()),
            ("windspeed_unit", "kmh".to_string()),
            ("timezone", location.timezone.to_string()),
        ],
    )
    .map_err(|e| anyhow::anyhow!("Invalid weather endpoint '{base_url}': {e}"))?;

    Ok(url.into())
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i64,
    is_day: u8,
    time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub condition: WmoInfo,
    pub code: i64,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub wind_cardinal: &'static str,
    pub is_day: bool,
    /// Observation time exactly as reported.
    pub time: String,
    /// Parsed form of `time`, when it is a local ISO-8601 timestamp.
    pub observed_at: Option<NaiveDateTime>,
}

impl WeatherCard {
    fn from_payload(data: &Value) -> Option<Self> {
        let current = data.get("current_weather")?;
        let current: CurrentWeather = match serde_json::from_value(current.clone()) {
            Ok(current) => current,
            Err(err) => {
                debug!(error = %err, "current_weather block is malformed");
                return None;
            }
        };

        let is_day = current.is_day != 0;
        let observed_at = parse_local_time(&current.time);

        Some(WeatherCard {
            condition: describe(current.weathercode, is_day),
            code: current.weathercode,
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            wind_direction_deg: current.winddirection,
            wind_cardinal: to_cardinal(current.winddirection),
            is_day,
            time: current.time,
            observed_at,
        })
    }
}

fn parse_local_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// View for the weather screen. A payload without a usable
/// `current_weather` block renders as [`View::Empty`].
pub fn weather_view(state: &FetchState) -> View<WeatherCard> {
    View::from_state(state, WeatherCard::from_payload)
}
