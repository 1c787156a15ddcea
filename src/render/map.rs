use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use crate::error::{Error, GeocodeError, Result};
use crate::models::{Coordinate, Route, TripRequest};
use crate::services::Geocoder;

/// Resolves every location of a route to a coordinate, in route order
pub fn resolve_coordinates<L, G>(
    route: &Route<L>,
    geocoder: &G,
) -> std::result::Result<Vec<Coordinate>, GeocodeError>
where
    L: AsRef<str>,
    G: Geocoder + ?Sized,
{
    route
        .locations()
        .iter()
        .map(|location| geocoder.geocode(location.as_ref()))
        .collect()
}

/// Marker captions in visiting order: `"<n>. <address>"`, followed by the
/// employee names dropped there when a trip request is given
pub fn marker_labels<L: AsRef<str>>(route: &Route<L>, request: Option<&TripRequest>) -> Vec<String> {
    route
        .locations()
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let address = location.as_ref();
            match request.and_then(|request| request.label(address)) {
                Some(names) => format!("{}. {} ({})", i + 1, address, names),
                None => format!("{}. {}", i + 1, address),
            }
        })
        .collect()
}

/// Draws a route as an SVG map: one captioned marker per location, the
/// connecting path and a legend
///
/// Longitude runs along x and latitude along y. The start is green, drop-offs are
/// red and the end is blue.
#[derive(Debug, Clone, Copy)]
pub struct MapRenderer {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub marker_size: u32,
    pub font_size: u32,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            margin: 20,
            marker_size: 6,
            font_size: 14,
        }
    }
}

impl MapRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn render_to_string<L>(
        &self,
        route: &Route<L>,
        coordinates: &[Coordinate],
        labels: &[String],
    ) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            self.draw(&root, route, coordinates, labels)?;
        }
        Ok(svg)
    }

    pub fn render_to_file<L, P: AsRef<Path>>(
        &self,
        route: &Route<L>,
        coordinates: &[Coordinate],
        labels: &[String],
        path: P,
    ) -> Result<()> {
        let root = SVGBackend::new(path.as_ref(), (self.width, self.height)).into_drawing_area();
        self.draw(&root, route, coordinates, labels)?;
        tracing::info!("Route map written to {}", path.as_ref().display());
        Ok(())
    }

    fn draw<L, DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        route: &Route<L>,
        coordinates: &[Coordinate],
        labels: &[String],
    ) -> Result<()> {
        if coordinates.len() != route.len() || labels.len() != route.len() {
            return Err(Error::Render(format!(
                "route has {} locations but {} coordinates and {} labels were given",
                route.len(),
                coordinates.len(),
                labels.len()
            )));
        }

        let points: Vec<(f64, f64)> = coordinates
            .iter()
            .map(|coordinate| (coordinate.longitude, coordinate.latitude))
            .collect();
        let (x_range, y_range) = determine_bounds(&points);

        root.fill(&WHITE).map_err(render_error)?;
        let mut chart = ChartBuilder::on(root)
            .margin(self.margin)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        let path_style = BLUE.mix(0.8).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), path_style))
            .map_err(render_error)?
            .label("Route")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], path_style));

        let font = ("sans-serif", self.font_size).into_font().color(&BLACK);
        let offset = self.marker_size as i32 + 4;
        let marker = |index: usize, radius: u32, style: ShapeStyle| {
            EmptyElement::at(points[index])
                + Circle::new((0, 0), radius, style)
                + Text::new(labels[index].clone(), (offset, -offset), font.clone())
        };

        let last = points.len() - 1;
        let endpoint_size = self.marker_size + 2;
        let start_style = GREEN.filled();
        let stop_style = RED.filled();
        let end_style = BLUE.filled();

        chart
            .draw_series(std::iter::once(marker(0, endpoint_size, start_style)))
            .map_err(render_error)?
            .label("Start")
            .legend(move |(x, y)| Circle::new((x, y), endpoint_size, start_style));

        if last > 1 {
            let stop_size = self.marker_size;
            chart
                .draw_series((1..last).map(|i| marker(i, stop_size, stop_style)))
                .map_err(render_error)?
                .label("Drop-off")
                .legend(move |(x, y)| Circle::new((x, y), stop_size, stop_style));
        }

        chart
            .draw_series(std::iter::once(marker(last, endpoint_size, end_style)))
            .map_err(render_error)?
            .label("End")
            .legend(move |(x, y)| Circle::new((x, y), endpoint_size, end_style));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(font.clone())
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn render_error<E: std::error::Error + Send + Sync>(error: DrawingAreaErrorKind<E>) -> Error {
    Error::Render(error.to_string())
}

/// Plot ranges covering all points with some padding
fn determine_bounds(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let pad_x = ((max_x - min_x) * 0.1).max(0.005);
    let pad_y = ((max_y - min_y) * 0.1).max(0.005);

    (
        (min_x - pad_x)..(max_x + pad_x),
        (min_y - pad_y)..(max_y + pad_y),
    )
}
