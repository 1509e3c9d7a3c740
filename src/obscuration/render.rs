//! Diagnostic drawing of the Sun and Moon disks in azimuth/altitude space
//!
//! The numeric core only talks to [`DiskRenderer`]; the SVG implementation
//! lives behind the `plot` feature.

use std::path::Path;

use crate::errors::Result;

/// One disk in azimuth/altitude space, all values in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    pub radius_deg: f64,
}

impl Disk {
    /// Boundary points, closed
    pub fn outline(&self, segments: usize) -> Vec<(f64, f64)> {
        let n = segments.max(8);
        (0..=n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                (
                    self.azimuth_deg + self.radius_deg * theta.cos(),
                    self.altitude_deg + self.radius_deg * theta.sin(),
                )
            })
            .collect()
    }
}

/// Everything needed to draw a single observation
#[derive(Debug, Clone, PartialEq)]
pub struct DiskScene {
    pub sun: Disk,
    pub moon: Disk,
    pub separation_deg: f64,
    pub title_lines: Vec<String>,
}

impl DiskScene {
    /// Square view centred on the Sun, 1.2x the largest of separation and radii
    pub fn view_extent(&self) -> ((f64, f64), (f64, f64)) {
        let biggest = self
            .separation_deg
            .max(self.sun.radius_deg)
            .max(self.moon.radius_deg)
            * 1.2;
        let biggest = if biggest > 0.0 { biggest } else { 1.0 };
        (
            (self.sun.azimuth_deg - biggest, self.sun.azimuth_deg + biggest),
            (self.sun.altitude_deg - biggest, self.sun.altitude_deg + biggest),
        )
    }
}

/// Writes an image of a [`DiskScene`] to `destination`
pub trait DiskRenderer: Send + Sync {
    fn render(&self, scene: &DiskScene, destination: &Path) -> Result<()>;
}

#[cfg(feature = "plot")]
pub use svg::SvgDiskRenderer;

#[cfg(feature = "plot")]
mod svg {
    use super::{DiskRenderer, DiskScene};
    use crate::errors::{ObscurationError, Result};
    use plotters::prelude::*;
    use std::path::Path;

    const OUTLINE_SEGMENTS: usize = 180;

    /// SVG renderer built on plotters
    #[derive(Debug, Clone, Copy)]
    pub struct SvgDiskRenderer {
        pub size: (u32, u32),
    }

    impl Default for SvgDiskRenderer {
        fn default() -> Self {
            SvgDiskRenderer { size: (700, 760) }
        }
    }

    type PlotResult = std::result::Result<(), Box<dyn std::error::Error>>;

    impl SvgDiskRenderer {
        fn draw(&self, scene: &DiskScene, destination: &Path) -> PlotResult {
            let ((x0, x1), (y0, y1)) = scene.view_extent();
            let root = SVGBackend::new(destination, self.size).into_drawing_area();
            root.fill(&WHITE)?;

            let title = scene.title_lines.join(" | ");
            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 16))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x0..x1, y0..y1)?;
            chart
                .configure_mesh()
                .x_desc("Azimuth")
                .y_desc("Altitude")
                .draw()?;

            chart.draw_series(std::iter::once(Polygon::new(
                scene.sun.outline(OUTLINE_SEGMENTS),
                YELLOW.filled(),
            )))?;
            chart.draw_series(std::iter::once(Polygon::new(
                scene.moon.outline(OUTLINE_SEGMENTS),
                BLACK.mix(0.5).filled(),
            )))?;

            root.present()?;
            Ok(())
        }
    }

    impl DiskRenderer for SvgDiskRenderer {
        fn render(&self, scene: &DiskScene, destination: &Path) -> Result<()> {
            self.draw(scene, destination)
                .map_err(|e| ObscurationError::Render(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> DiskScene {
        DiskScene {
            sun: Disk {
                azimuth_deg: 120.0,
                altitude_deg: 20.0,
                radius_deg: 0.267,
            },
            moon: Disk {
                azimuth_deg: 120.1,
                altitude_deg: 20.05,
                radius_deg: 0.255,
            },
            separation_deg: 0.11,
            title_lines: vec!["Lat: 37.54° Lon: -122.11°".to_string()],
        }
    }

    #[test]
    fn test_outline_is_closed_circle() {
        let disk = scene().sun;
        let pts = disk.outline(90);
        assert_eq!(pts.len(), 91);
        assert!((pts[0].0 - pts[90].0).abs() < 1e-12);
        for (x, y) in pts {
            let r = ((x - disk.azimuth_deg).powi(2) + (y - disk.altitude_deg).powi(2)).sqrt();
            assert!((r - disk.radius_deg).abs() < 1e-12);
        }
    }

    #[test]
    fn test_view_extent_centred_on_sun() {
        let ((x0, x1), (y0, y1)) = scene().view_extent();
        assert!(((x0 + x1) / 2.0 - 120.0).abs() < 1e-12);
        assert!(((y1 - y0) / 2.0 - 0.267 * 1.2).abs() < 1e-12);
    }

    #[cfg(feature = "plot")]
    #[test]
    fn test_svg_renderer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obscuration.svg");
        SvgDiskRenderer::default().render(&scene(), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        assert!(contents.contains("polygon") || contents.contains("path"));
    }
}
