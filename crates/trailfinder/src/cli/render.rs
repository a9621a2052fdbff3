//! Text and JSON rendering for command output.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde_json::json;

use super::OutputFormat;
use crate::elevation::{project, ElevationPath, Viewport};
use crate::error::Result;
use crate::trail::Trail;

/// Shown by `list` when no trail survives the filters.
pub const EMPTY_LIST_MESSAGE: &str = "No trails match these filters.";

/// Shown when a trail has no drawable elevation profile.
pub const NO_PROFILE_MESSAGE: &str = "No elevation profile for this trail.";

fn altitude_range(trail: &Trail) -> String {
    match (trail.lowest_point_m, trail.highest_point_m) {
        (Some(low), Some(high)) => format!("{low:.0}-{high:.0} m"),
        (None, Some(high)) => format!("up to {high:.0} m"),
        (Some(low), None) => format!("from {low:.0} m"),
        (None, None) => "-".to_string(),
    }
}

/// One-line summary used by the plain list.
#[must_use]
pub fn summary_line(trail: &Trail, favorite: bool) -> String {
    format!(
        "{} {} ({}) | {} | {:.1} km | +{:.0} m | {:.1} h | {:.1}/5",
        if favorite { "*" } else { " " },
        trail.name,
        trail.difficulty,
        trail.location,
        trail.distance_km,
        trail.elevation_gain_m,
        trail.duration_hours,
        trail.rating,
    )
}

/// The list-row chart for `trail`, as line path data in the thumbnail viewport.
#[must_use]
pub fn thumbnail(trail: &Trail) -> Option<String> {
    project(trail.profile(), Viewport::THUMBNAIL).map(|path| path.line())
}

fn thumbnail_row(trail: &Trail) -> String {
    format!(
        "    {}\n",
        thumbnail(trail).unwrap_or_else(|| "(no profile)".to_string())
    )
}

fn table(trails: &[&Trail], favorites: &BTreeSet<String>, profiles: bool) -> String {
    let mut out = format!(
        "  {:<24} {:<28} {:<9} {:>8} {:>8} {:>14} {:>6}\n",
        "ID", "NAME", "LEVEL", "DIST", "GAIN", "ALTITUDE", "RATING"
    );
    for trail in trails {
        let _ = writeln!(
            out,
            "{} {:<24} {:<28} {:<9} {:>5.1} km {:>6.0} m {:>14} {:>6.1}",
            if favorites.contains(&trail.id) { "*" } else { " " },
            trail.id,
            trail.name,
            trail.difficulty,
            trail.distance_km,
            trail.elevation_gain_m,
            altitude_range(trail),
            trail.rating,
        );
        if profiles {
            out.push_str(&thumbnail_row(trail));
        }
    }
    out
}

/// Render the filtered list, with pinned favorites first. With `profiles`,
/// every row is followed by its thumbnail chart path.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn render_list(
    visible: &[&Trail],
    pinned: &[&Trail],
    favorites: &BTreeSet<String>,
    format: OutputFormat,
    profiles: bool,
) -> Result<String> {
    if format == OutputFormat::Json {
        let pinned_ids: Vec<&str> = pinned.iter().map(|t| t.id.as_str()).collect();
        let mut doc = json!({
            "pinned": pinned_ids,
            "saved": favorites.len(),
            "trails": visible,
        });
        if profiles {
            let paths: serde_json::Map<String, serde_json::Value> = visible
                .iter()
                .map(|t| (t.id.clone(), json!(thumbnail(t))))
                .collect();
            doc["profiles"] = serde_json::Value::Object(paths);
        }
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    if visible.is_empty() {
        return Ok(format!("{EMPTY_LIST_MESSAGE}\n"));
    }

    let section = |trails: &[&Trail]| match format {
        OutputFormat::Table => table(trails, favorites, profiles),
        _ => trails
            .iter()
            .map(|t| {
                let mut row = summary_line(t, favorites.contains(&t.id)) + "\n";
                if profiles {
                    row.push_str(&thumbnail_row(t));
                }
                row
            })
            .collect(),
    };

    let mut out = String::new();
    if !pinned.is_empty() {
        let _ = writeln!(
            out,
            "Pinned ({} shown, {} saved)",
            pinned.len(),
            favorites.len()
        );
        out.push_str(&section(pinned));
        out.push('\n');
    }
    let _ = writeln!(out, "Trails ({})", visible.len());
    out.push_str(&section(visible));
    Ok(out)
}

/// Render the detail view of one trail.
#[must_use]
pub fn render_detail(
    trail: &Trail,
    favorite: bool,
    note: &str,
    path: Option<&ElevationPath>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}",
        trail.name,
        if favorite { "  [favorite]" } else { "" }
    );
    let _ = writeln!(out, "{}", trail.location);
    out.push('\n');
    let _ = writeln!(out, "Difficulty:  {}", trail.difficulty);
    let _ = writeln!(out, "Distance:    {:.1} km", trail.distance_km);
    let _ = writeln!(out, "Gain:        {:.0} m", trail.elevation_gain_m);
    let _ = writeln!(out, "Altitude:    {}", altitude_range(trail));
    let _ = writeln!(out, "Duration:    {:.1} h", trail.duration_hours);
    let _ = writeln!(out, "Rating:      {:.1}/5", trail.rating);
    out.push('\n');
    let _ = writeln!(out, "{}", trail.description);

    if !trail.highlights.is_empty() {
        out.push_str("\nHighlights\n");
        for highlight in &trail.highlights {
            let _ = writeln!(out, "  - {highlight}");
        }
    }

    out.push_str("\nElevation\n");
    match path {
        Some(path) => {
            let _ = writeln!(out, "  {}", path.caption());
            let _ = writeln!(out, "  {}", path.line());
        }
        None => {
            let _ = writeln!(out, "  {NO_PROFILE_MESSAGE}");
        }
    }

    if !note.is_empty() {
        out.push_str("\nNotes\n");
        for line in note.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Render a projected profile as path data or JSON.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn render_profile(path: &ElevationPath, area: bool, as_json: bool) -> Result<String> {
    let d = if area { path.area() } else { path.line() };
    if !as_json {
        return Ok(d);
    }

    let doc = json!({
        "width": path.viewport.width,
        "height": path.viewport.height,
        "minM": path.min_m,
        "maxM": path.max_m,
        "caption": path.caption(),
        "path": d,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}
