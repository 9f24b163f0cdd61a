//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use recipebook_core::Recipe;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print one recipe as a list row.
pub fn recipe_row(recipe: &Recipe) {
    let id = recipe.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
    let mut details = format!("serves {}", recipe.suitable_for);
    if recipe.vegetarian {
        details.push_str(", vegetarian");
    }
    println!("{}  {}  {}", id.dimmed(), recipe.name.bold(), details.dimmed());
}

/// Render an RFC 3339 timestamp in local time, or as given if it does not
/// parse.
pub fn timestamp(value: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|time| {
            time.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_timestamp_is_shown_verbatim() {
        assert_eq!(timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn timestamp_is_shortened_to_minutes() {
        let shown = timestamp("2024-03-01T12:34:56.789+00:00");
        assert_eq!(shown.len(), "2024-03-01 12:34".len());
    }
}
