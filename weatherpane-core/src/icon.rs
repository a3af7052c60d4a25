//! Condition code to weather-icons class mapping.
//!
//! Codes follow the OpenWeather condition list: the hundreds digit names the
//! family (2xx thunderstorm, 3xx drizzle, 5xx rain, 6xx snow, 7xx atmosphere,
//! 80x clear/clouds, 9xx extreme).

/// Class prefix for the weather-icons font.
pub const ICON_NAMESPACE: &str = "wi wi-";

const CLEAR_SKY: i64 = 800;
const FALLBACK_ICON: &str = "cloudy";

/// Exact matches win over the family table.
fn exact_icon(code: i64) -> Option<&'static str> {
    let icon = match code {
        711 => "smoke",
        731 | 751 | 761 => "dust",
        762 => "volcano",
        771 => "strong-wind",
        781 | 900 => "tornado",
        800 => "sunny",
        801..=804 => "cloudy",
        901 | 902 => "hurricane",
        903 => "snowflake-cold",
        904 => "hot",
        905 => "windy",
        906 => "hail",
        _ => return None,
    };
    Some(icon)
}

fn family_icon(code: i64) -> Option<&'static str> {
    let icon = match code.div_euclid(100) {
        2 => "thunderstorm",
        3 => "sprinkle",
        5 => "rain",
        6 => "snow",
        7 => "fog",
        _ => return None,
    };
    Some(icon)
}

/// Atmosphere and extreme codes look the same by day and by night.
fn is_time_neutral(code: i64) -> bool {
    (700..800).contains(&code) || code >= 900
}

/// Resolves the icon class for a condition code.
///
/// Never fails: unknown codes render as `cloudy`. Clear sky always uses the
/// `day-` variant, even at night.
pub fn resolve_icon(code: i64, is_day: bool) -> String {
    let base = exact_icon(code)
        .or_else(|| family_icon(code))
        .unwrap_or(FALLBACK_ICON);

    if is_time_neutral(code) {
        return format!("{ICON_NAMESPACE}{base}");
    }

    let variant = if code == CLEAR_SKY || is_day { "day" } else { "night" };
    format!("{ICON_NAMESPACE}{variant}-{base}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_get_day_night_variants() {
        assert_eq!(resolve_icon(201, true), "wi wi-day-thunderstorm");
        assert_eq!(resolve_icon(201, false), "wi wi-night-thunderstorm");
        assert_eq!(resolve_icon(301, true), "wi wi-day-sprinkle");
        assert_eq!(resolve_icon(522, false), "wi wi-night-rain");
        assert_eq!(resolve_icon(600, true), "wi wi-day-snow");
        assert_eq!(resolve_icon(803, false), "wi wi-night-cloudy");
    }

    #[test]
    fn clear_sky_is_always_day() {
        assert_eq!(resolve_icon(800, true), "wi wi-day-sunny");
        assert_eq!(resolve_icon(800, false), "wi wi-day-sunny");
    }

    #[test]
    fn atmosphere_band_has_no_variant() {
        assert_eq!(resolve_icon(741, true), "wi wi-fog");
        assert_eq!(resolve_icon(741, false), "wi wi-fog");
        assert_eq!(resolve_icon(701, false), "wi wi-fog");
        assert_eq!(resolve_icon(711, true), "wi wi-smoke");
        assert_eq!(resolve_icon(781, false), "wi wi-tornado");
    }

    #[test]
    fn extreme_codes_have_no_variant() {
        assert_eq!(resolve_icon(905, true), "wi wi-windy");
        assert_eq!(resolve_icon(906, false), "wi wi-hail");
        assert_eq!(resolve_icon(950, true), "wi wi-cloudy");
        assert_eq!(resolve_icon(1200, false), "wi wi-cloudy");
    }

    #[test]
    fn unknown_codes_fall_back_to_cloudy() {
        assert_eq!(resolve_icon(0, true), "wi wi-day-cloudy");
        assert_eq!(resolve_icon(450, false), "wi wi-night-cloudy");
        assert_eq!(resolve_icon(-301, true), "wi wi-day-cloudy");
        assert_eq!(resolve_icon(899, false), "wi wi-night-cloudy");
    }

    #[test]
    fn every_code_resolves_to_a_namespaced_icon() {
        for code in -1_000..2_000 {
            for is_day in [true, false] {
                let icon = resolve_icon(code, is_day);
                assert!(icon.len() > ICON_NAMESPACE.len(), "code {code}");
                assert!(icon.starts_with(ICON_NAMESPACE));
                if is_time_neutral(code) {
                    assert!(!icon.contains("day-") && !icon.contains("night-"), "code {code}");
                }
            }
        }
        assert!(!resolve_icon(i64::MIN, true).is_empty());
        assert!(!resolve_icon(i64::MAX, false).is_empty());
    }
}
