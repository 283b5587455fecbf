/// Icon category for a short forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTag {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
    Wind,
}

impl IconTag {
    pub fn glyph(self) -> &'static str {
        match self {
            IconTag::Sunny => "\u{2600}\u{fe0f}",
            IconTag::PartlyCloudy => "\u{1f324}\u{fe0f}",
            IconTag::Cloudy => "\u{2601}\u{fe0f}",
            IconTag::Rain => "\u{1f327}\u{fe0f}",
            IconTag::Snow => "\u{2744}\u{fe0f}",
            IconTag::Thunderstorm => "\u{26c8}\u{fe0f}",
            IconTag::Fog => "\u{1f32b}\u{fe0f}",
            IconTag::Wind => "\u{1f4a8}",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IconTag::Sunny => "sunny",
            IconTag::PartlyCloudy => "partly_cloudy",
            IconTag::Cloudy => "cloudy",
            IconTag::Rain => "rain",
            IconTag::Snow => "snow",
            IconTag::Thunderstorm => "thunderstorm",
            IconTag::Fog => "fog",
            IconTag::Wind => "wind",
        }
    }
}

// Order matters: the first rule with a matching keyword wins.
const RULES: &[(&[&str], IconTag)] = &[
    (&["sunny", "clear", "fair"], IconTag::Sunny),
    (&["partly cloudy", "mostly clear"], IconTag::PartlyCloudy),
    (&["cloudy", "overcast", "mostly cloudy"], IconTag::Cloudy),
    (&["rain", "shower", "precipitation"], IconTag::Rain),
    (&["snow"], IconTag::Snow),
    (&["thunder", "storm"], IconTag::Thunderstorm),
    (&["fog", "mist"], IconTag::Fog),
    (&["wind", "windy"], IconTag::Wind),
];

/// Maps a short forecast such as "Chance Showers And Thunderstorms" to an icon
pub fn classify(short_forecast: Option<&str>) -> IconTag {
    let forecast = match short_forecast {
        Some(text) if !text.is_empty() => text.to_lowercase(),
        _ => return IconTag::PartlyCloudy,
    };

    if forecast.contains("rain") && forecast.contains("thunder") {
        return IconTag::Thunderstorm;
    }

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| forecast.contains(k)))
        .map(|(_, tag)| *tag)
        .unwrap_or(IconTag::PartlyCloudy)
}
