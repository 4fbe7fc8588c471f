//! Human-readable dashboard output.

use colored::{Color, Colorize};
use weather_core::{Session, SessionState, Theme, TimeOfDay, WeatherResult};

struct Palette {
    label: Color,
    value: Color,
    error: Color,
    accent: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            label: Color::Blue,
            value: Color::Black,
            error: Color::Red,
            accent: Color::Blue,
        },
        Theme::Dark => Palette {
            label: Color::BrightCyan,
            value: Color::BrightWhite,
            error: Color::BrightRed,
            accent: Color::BrightBlue,
        },
    }
}

/// Header tint, following the morning/afternoon/night backgrounds.
fn header_color(time_of_day: TimeOfDay) -> Color {
    match time_of_day {
        TimeOfDay::Morning => Color::Cyan,
        TimeOfDay::Afternoon => Color::Yellow,
        TimeOfDay::Night => Color::Blue,
    }
}

pub fn render_dashboard(session: &Session, time_of_day: TimeOfDay) -> String {
    let colors = palette(session.theme());
    let heading = "Weather Dashboard".color(header_color(time_of_day)).bold();
    let mut out = vec![heading.to_string()];

    match session.state() {
        SessionState::Idle => {}
        SessionState::Loading { .. } => out.push("Loading...".color(colors.accent).to_string()),
        SessionState::Success(result) => out.push(render_result(result, session.theme())),
        SessionState::Failed(failure) => out.push(failure.message.color(colors.error).to_string()),
    }

    if !session.recent().is_empty() {
        out.push(String::new());
        out.push("Recent Searches:".color(colors.label).bold().to_string());
        out.extend(session.recent().iter().map(|city| format!("  - {city}")));
    }

    out.join("\n")
}

pub fn render_result(result: &WeatherResult, theme: Theme) -> String {
    let colors = palette(theme);
    let field = |label: &str, value: String| {
        format!(
            "  {} {}",
            format!("{label}:").color(colors.label),
            value.color(colors.value)
        )
    };

    [
        format!("Weather in {}", result.city_name).bold().to_string(),
        field("Temperature", format!("{} °C", result.temperature_celsius)),
        field("Wind Speed", format!("{} m/s", result.wind_speed_mps)),
        field("Humidity", format!("{} %", result.humidity_pct)),
        field("Weather", result.condition_description.clone()),
    ]
    .join("\n")
}
