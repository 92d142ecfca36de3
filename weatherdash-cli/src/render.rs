use std::fmt::{self, Write};
use weatherdash_core::DashboardView;

const EMPTY_PROMPT: &str = "Search for a city to see the weather";

/// Plain-text rendering of the dashboard view.
pub fn dashboard(view: &DashboardView) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, view)?;
    Ok(out)
}

fn write_dashboard(out: &mut String, view: &DashboardView) -> fmt::Result {
    if view.loading {
        return writeln!(out, "Loading...");
    }
    if let Some(error) = &view.error {
        return writeln!(out, "! {error}");
    }
    if view.show_empty_prompt {
        return writeln!(out, "{EMPTY_PROMPT}");
    }

    if let Some(current) = &view.current {
        writeln!(out, "{}  [{}, °{}]", current.location, view.theme, view.unit.symbol())?;
        writeln!(out, "  {}  {}", current.temperature, capitalize(&current.description))?;
        writeln!(
            out,
            "  Feels like {} | Humidity {} | Wind {}",
            current.feels_like, current.humidity, current.wind
        )?;
    }

    if !view.forecast.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}-Day Forecast", view.forecast.len())?;
        for day in &view.forecast {
            writeln!(
                out,
                "  {:<12} {:>6}  {}",
                day.date,
                day.temperature,
                capitalize(&day.description)
            )?;
        }
    }

    Ok(())
}

/// Upper-cases the first letter of every word.
fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdash_core::{
        Theme, Unit,
        dashboard::{CurrentCard, DayCard},
    };

    fn view() -> DashboardView {
        DashboardView {
            theme: Theme::Clear,
            gradient: Theme::Clear.gradient(),
            unit: Unit::Celsius,
            loading: false,
            error: None,
            current: Some(CurrentCard {
                location: "Paris, FR".into(),
                icon_url: None,
                temperature: "15°C".into(),
                description: "clear sky".into(),
                feels_like: "14°C".into(),
                humidity: "72%".into(),
                wind: "4 m/s".into(),
            }),
            forecast: vec![DayCard {
                date: "Mon, Jan 5".into(),
                icon_url: None,
                temperature: "10°C".into(),
                description: "broken clouds".into(),
            }],
            show_empty_prompt: false,
        }
    }

    #[test]
    fn renders_current_and_forecast() {
        let out = dashboard(&view()).unwrap();
        assert!(out.contains("Paris, FR  [clear, °C]"));
        assert!(out.contains("15°C  Clear Sky"));
        assert!(out.contains("Humidity 72%"));
        assert!(out.contains("1-Day Forecast"));
        assert!(out.contains("Broken Clouds"));
    }

    #[test]
    fn error_replaces_cards() {
        let mut v = view();
        v.current = None;
        v.forecast.clear();
        v.error = Some("city not found".into());
        assert_eq!(dashboard(&v).unwrap(), "! city not found\n");
    }

    #[test]
    fn empty_state_prompts() {
        let mut v = view();
        v.current = None;
        v.forecast.clear();
        v.show_empty_prompt = true;
        assert_eq!(dashboard(&v).unwrap(), format!("{EMPTY_PROMPT}\n"));
    }

    #[test]
    fn capitalize_words() {
        assert_eq!(capitalize("light rain"), "Light Rain");
        assert_eq!(capitalize(""), "");
    }
}
