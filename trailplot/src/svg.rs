//! SVG export: elevation chart on top, track map below. Both are
//! drawn from the same profile points.

use anyhow::Error as AnyError;
use log::warn;
use plotters::{coord::Shift, prelude::*};
use std::{ops::Range, path::Path};
use trailprof::{MapView, Profile, Trail};

const DEFAULT_LINE: RGBColor = RGBColor(0x88, 0x84, 0xd8);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

pub fn render(trail: &Trail, view: &MapView, out: &Path, size: (u32, u32)) -> Result<(), AnyError> {
    let root = SVGBackend::new(out, size).into_drawing_area();
    root.fill(&WHITE)?;

    let title = trail.name.as_deref().unwrap_or("Track");
    let line = line_style(view);

    let (upper, lower) = root.split_vertically(size.1 / 2);
    draw_profile(&upper, &trail.profile, title, line)?;
    draw_map(&lower, &trail.profile, view, line)?;

    root.present()?;
    Ok(())
}

fn draw_profile(area: &Area, profile: &Profile, title: &str, line: ShapeStyle) -> Result<(), AnyError> {
    let x_range = padded(
        0.0,
        profile.points.last().map_or(0.0, |point| point.distance_km),
        0.0,
    );
    let (min_ele, max_ele) = profile
        .points
        .iter()
        .map(|point| f64::from(point.elevation_m))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), ele| {
            (lo.min(ele), hi.max(ele))
        });
    let y_range = padded(min_ele, max_ele, 10.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Distance")
        .y_desc("Elevation (m)")
        .x_label_formatter(&|km| format!("{km:.1}km"))
        .y_label_formatter(&|m| format!("{m:.0}"))
        .draw()?;

    let color = line.color;
    chart
        .draw_series(LineSeries::new(
            profile
                .points
                .iter()
                .map(|point| (point.distance_km, f64::from(point.elevation_m))),
            line,
        ))?
        .label("Elevation (m)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_map(area: &Area, profile: &Profile, view: &MapView, line: ShapeStyle) -> Result<(), AnyError> {
    let center = view.center();
    let (x_range, y_range) = match profile.bounds() {
        Some(rect) => (
            padded(rect.min().x, rect.max().x, 0.0),
            padded(rect.min().y, rect.max().y, 0.0),
        ),
        None => (padded(center.x, center.x, 0.0), padded(center.y, center.y, 0.0)),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(format!("zoom {}", view.zoom()), ("sans-serif", 20))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_label_formatter(&|lon| format!("{lon:.3}"))
        .y_label_formatter(&|lat| format!("{lat:.3}"))
        .draw()?;

    let positions = view.positions();
    chart.draw_series(LineSeries::new(
        positions.iter().map(|[lat, lon]| (*lon, *lat)),
        line,
    ))?;

    let ends = [positions.first(), positions.last()];
    chart.draw_series(
        ends.into_iter()
            .flatten()
            .map(|[lat, lon]| Circle::new((*lon, *lat), 5, line.color.filled())),
    )?;

    chart.draw_series(std::iter::once(Cross::new(
        (center.x, center.y),
        6,
        BLACK.stroke_width(1),
    )))?;

    Ok(())
}

fn line_style(view: &MapView) -> ShapeStyle {
    let config = view.config();
    let color = hex_color(&config.line_color).unwrap_or_else(|| {
        warn!(
            "line_color {:?} is not #rrggbb, using the default",
            config.line_color
        );
        DEFAULT_LINE
    });
    color.stroke_width(config.line_weight)
}

/// Parses `#rrggbb`.
fn hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(hex.get(idx..idx + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Returns `lo..hi` widened by `margin` on each side, and by 5% of
/// the span (or 0.001 for a degenerate span) when `margin` is zero.
fn padded(lo: f64, hi: f64, margin: f64) -> Range<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return 0.0..1.0;
    }
    let margin = if margin > 0.0 {
        margin
    } else {
        ((hi - lo) * 0.05).max(0.001)
    };
    (lo - margin)..(hi + margin)
}

#[cfg(test)]
mod tests {
    use super::{hex_color, line_style, padded, RGBColor, DEFAULT_LINE};
    use plotters::style::Color;
    use trailprof::{MapConfig, MapView, Profile};

    #[test]
    fn test_line_style() {
        let config = MapConfig {
            line_color: "#ff0000".to_string(),
            line_weight: 5,
            ..MapConfig::default()
        };
        let style = line_style(&MapView::new(config, &Profile::default()));
        assert_eq!(style.color.rgb(), (0xff, 0, 0));
        assert_eq!(style.stroke_width, 5);
    }

    #[test]
    fn test_line_style_bad_color_falls_back() {
        let config = MapConfig {
            line_color: "purple".to_string(),
            ..MapConfig::default()
        };
        let style = line_style(&MapView::new(config, &Profile::default()));
        assert_eq!(style.color.rgb(), DEFAULT_LINE.rgb());
        assert_eq!(style.stroke_width, 3);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#8884d8"), Some(RGBColor(0x88, 0x84, 0xd8)));
        assert_eq!(hex_color("8884d8"), None);
        assert_eq!(hex_color("#88"), None);
        assert_eq!(hex_color("#zz84d8"), None);
    }

    #[test]
    fn test_padded() {
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY, 10.0), 0.0..1.0);
        assert_eq!(padded(100.0, 200.0, 10.0), 90.0..210.0);
        let range = padded(1.0, 1.0, 0.0);
        assert!(range.start < 1.0 && range.end > 1.0);
    }
}
