//! Renders the monthly comparison chart: three vertically stacked panels
//! (temperature, precipitation, wind), one line per city.

use crate::aggregate::{MonthlyRow, MonthlyTable};
use chrono::NaiveDate;
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No monthly rows to plot")]
    NoData,

    #[error("Failed to render chart: {0}")]
    Render(String),
}

struct Panel {
    title: &'static str,
    y_desc: &'static str,
    value: fn(&MonthlyRow) -> f64,
}

fn temperature(row: &MonthlyRow) -> f64 {
    row.temperature_2m_mean
}

fn precipitation(row: &MonthlyRow) -> f64 {
    row.precipitation_sum
}

fn wind(row: &MonthlyRow) -> f64 {
    row.wind_speed_10m_max
}

const PANELS: [Panel; 3] = [
    Panel {
        title: "Monthly Mean Temperature",
        y_desc: "Temperature (°C)",
        value: temperature,
    },
    Panel {
        title: "Monthly Precipitation Sum",
        y_desc: "Precipitation (mm)",
        value: precipitation,
    },
    Panel {
        title: "Monthly Max Wind Speed",
        y_desc: "Wind Speed (km/h)",
        value: wind,
    },
];

/// Draws one line per city in each of the three panels and saves the image.
///
/// Tables and city names are parallel sequences; extra entries on either
/// side are ignored, matching zip semantics.
pub fn render_comparison(
    tables: &[MonthlyTable],
    cities: &[&str],
    path: &Path,
) -> Result<(), ChartError> {
    let (x_min, x_max) = date_range(tables).ok_or(ChartError::NoData)?;

    let root = BitMapBackend::new(path, (1200, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let areas = root.split_evenly((3, 1));
    for (area, panel) in areas.iter().zip(PANELS.iter()) {
        draw_panel(area, panel, tables, cities, x_min, x_max)?;
    }

    root.present().map_err(render_err)?;
    info!("Wrote comparison chart to {}", path.display());
    Ok(())
}

/// Opens the saved chart with the system viewer when a display is attached.
/// Failure to open is logged, never fatal.
pub fn show(path: &Path) {
    if !display_available() {
        info!(
            "No display attached; skipping interactive view of {}",
            path.display()
        );
        return;
    }
    match webbrowser::open(&path.display().to_string()) {
        Ok(()) => info!("Opened {} in the system viewer", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}

fn display_available() -> bool {
    cfg!(any(target_os = "windows", target_os = "macos"))
        || std::env::var_os("DISPLAY").is_some()
        || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    tables: &[MonthlyTable],
    cities: &[&str],
    x_min: NaiveDate,
    x_max: NaiveDate,
) -> Result<(), ChartError> {
    let (y_min, y_max) = value_range(tables, panel.value).ok_or(ChartError::NoData)?;

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(panel.y_desc)
        .x_labels(10)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()
        .map_err(render_err)?;

    for (idx, (table, city)) in tables.iter().zip(cities.iter()).enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                table.iter().map(|row| (row.date, (panel.value)(row))),
                color.stroke_width(2),
            ))
            .map_err(render_err)?
            .label(*city)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Shared x range over every table, padded by half a month per side so the
/// first and last points are not drawn on the frame.
fn date_range(tables: &[MonthlyTable]) -> Option<(NaiveDate, NaiveDate)> {
    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    for row in tables.iter().flatten() {
        min = Some(min.map_or(row.date, |m| m.min(row.date)));
        max = Some(max.map_or(row.date, |m| m.max(row.date)));
    }
    let (min, max) = (min?, max?);
    Some((
        min - chrono::Duration::days(15),
        max + chrono::Duration::days(15),
    ))
}

fn value_range(tables: &[MonthlyTable], value: fn(&MonthlyRow) -> f64) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in tables.iter().flatten() {
        let v = value(row);
        min = min.min(v);
        max = max.max(v);
    }
    if min > max {
        return None;
    }
    let pad = ((max - min) * 0.05).max(1.0);
    Some((min - pad, max + pad))
}
