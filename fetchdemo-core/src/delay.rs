use std::{fmt, time::Duration};

/// The minimum-loader choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderDelay(u64);

impl LoaderDelay {
    const CHOICES_MS: [u64; 5] = [0, 500, 1000, 1500, 2000];

    pub fn all() -> impl Iterator<Item = LoaderDelay> {
        Self::CHOICES_MS.into_iter().map(LoaderDelay)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for LoaderDelay {
    fn default() -> Self {
        LoaderDelay(1000)
    }
}

impl fmt::Display for LoaderDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

impl TryFrom<u64> for LoaderDelay {
    type Error = anyhow::Error;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        if Self::CHOICES_MS.contains(&ms) {
            Ok(LoaderDelay(ms))
        } else {
            let choices: Vec<String> = Self::CHOICES_MS.iter().map(u64::to_string).collect();
            Err(anyhow::anyhow!(
                "Unsupported loader delay {ms} ms. Choose one of: {}.",
                choices.join(", ")
            ))
        }
    }
}

impl TryFrom<&str> for LoaderDelay {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim().trim_end_matches("ms").trim();
        let ms: u64 = trimmed
            .parse()
            .map_err(|_| anyhow::anyhow!("Loader delay '{value}' is not a number of milliseconds"))?;
        LoaderDelay::try_from(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_roundtrip() {
        for delay in LoaderDelay::all() {
            let parsed = LoaderDelay::try_from(delay.as_millis()).expect("choice should parse");
            assert_eq!(parsed, delay);
        }
        assert_eq!(LoaderDelay::all().count(), 5);
    }

    #[test]
    fn rejects_values_off_the_menu() {
        let err = LoaderDelay::try_from(750_u64).unwrap_err().to_string();
        assert!(err.contains("750"));
        assert!(err.contains("0, 500, 1000, 1500, 2000"));
    }

    #[test]
    fn parses_strings_with_optional_suffix() {
        assert_eq!(LoaderDelay::try_from("1500").unwrap().as_millis(), 1500);
        assert_eq!(LoaderDelay::try_from("500ms").unwrap().as_millis(), 500);
        assert!(LoaderDelay::try_from("soon").is_err());
    }

    #[test]
    fn default_is_one_second() {
        assert_eq!(LoaderDelay::default().as_duration(), Duration::from_secs(1));
        assert_eq!(LoaderDelay::default().to_string(), "1000 ms");
    }
}
