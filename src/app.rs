use std::sync::Arc;

use anyhow::Result;
use coords2country::geo::{format_coords, normalize_lon};
use coords2country::{CountryRecord, Geocoder, IntensityGrid, MapResources};
use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::viewport::Viewport;

/// Land and border dots for the visible part of the map
pub struct MapLayers {
    pub land: BrailleCanvas,
    pub borders: BrailleCanvas,
}

/// What the mouse is pointing at
pub struct Hover {
    pub lat: f64,
    pub lon: f64,
    /// `None` outside the mapped band
    pub country: Option<CountryRecord>,
}

/// Explorer state
pub struct App {
    pub viewport: Viewport,
    pub geocoder: Geocoder,
    pub resources: Arc<MapResources>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    pub hover: Option<Hover>,
    /// Last resolution error, shown in the status bar
    pub error: Option<String>,
}

impl App {
    pub fn new(geocoder: Geocoder, width: usize, height: usize) -> Result<Self> {
        let resources = geocoder.resources()?;
        let (dot_width, dot_height) = Self::dot_size(width, height);

        Ok(Self {
            viewport: Viewport::world(dot_width, dot_height),
            geocoder,
            resources,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            hover: None,
            error: None,
        })
    }

    /// Braille dots available inside the border and above the status bar
    fn dot_size(width: usize, height: usize) -> (usize, usize) {
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(3); // 2 for border + 1 for status bar
        (inner_width * 2, inner_height * 4)
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = Self::dot_size(width, height);
        self.viewport.width = w;
        self.viewport.height = h;
    }

    /// Back to the whole map
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.refresh_hover();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.refresh_hover();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.refresh_hover();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::to_dots(col, row);
        self.viewport.zoom_in_at(px, py);
        self.refresh_hover();
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::to_dots(col, row);
        self.viewport.zoom_out_at(px, py);
        self.refresh_hover();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pan while dragging with the left button
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            // One terminal cell is 2x4 dots
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Track the mouse and resolve the country under it
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        if self.mouse_pos != Some((col, row)) {
            self.mouse_pos = Some((col, row));
            self.refresh_hover();
        }
    }

    /// Mouse position in dot coordinates
    pub fn mouse_dot_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| Self::to_dots(col, row))
    }

    /// Terminal cell to dot coordinates, accounting for the 1-cell border
    fn to_dots(col: u16, row: u16) -> (i32, i32) {
        let px = (col.saturating_sub(1) as i32) * 2;
        let py = (row.saturating_sub(1) as i32) * 4;
        (px, py)
    }

    fn refresh_hover(&mut self) {
        let Some((px, py)) = self.mouse_dot_pos() else {
            return;
        };
        let (lon, lat) = self.viewport.unproject(px, py);

        match self.geocoder.resolve_in(&self.resources, lat, lon) {
            Ok(country) => {
                self.hover = Some(Hover { lat, lon, country });
                self.error = None;
            }
            Err(e) => {
                self.hover = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Status bar text for the hovered point
    pub fn hover_text(&self) -> String {
        match &self.hover {
            Some(Hover {
                lat,
                lon,
                country: Some(record),
            }) => format!("{} → {}", format_coords(*lat, *lon), record),
            Some(Hover { lat, lon, country: None }) => {
                format!("{} → unmapped", format_coords(*lat, *lon))
            }
            None => "move the mouse over the map".to_string(),
        }
    }

    /// Center of the view as text
    pub fn center_coords(&self) -> String {
        format_coords(self.viewport.center_lat, self.viewport.center_lon)
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Draw land and border dots for a canvas of `cols` x `rows` characters
    pub fn render_layers(&self, cols: usize, rows: usize) -> MapLayers {
        let mut land = BrailleCanvas::new(cols, rows);
        let mut borders = BrailleCanvas::new(cols, rows);
        let (w, h) = (land.dot_width(), land.dot_height());

        let mut viewport = self.viewport.clone();
        viewport.width = w;
        viewport.height = h;

        // Shade under every dot, None for sea and unmapped shades
        let mut shades: Vec<Option<u8>> = vec![None; w * h];
        shades
            .par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(py, row)| {
                for (px, slot) in row.iter_mut().enumerate() {
                    let (lon, lat) = viewport.unproject(px as i32, py as i32);
                    *slot = self.mapped_shade(lat, lon);
                }
            });

        for py in 0..h {
            for px in 0..w {
                let Some(shade) = shades[py * w + px] else {
                    continue;
                };
                land.set(px, py);

                // A dot whose right or lower neighbour differs sits on a border or coast
                let right = if px + 1 < w { shades[py * w + px + 1] } else { Some(shade) };
                let below = if py + 1 < h { shades[(py + 1) * w + px] } else { Some(shade) };
                if right != Some(shade) || below != Some(shade) {
                    borders.set(px, py);
                }
            }
        }

        MapLayers { land, borders }
    }

    /// Raster shade at a coordinate if it belongs to a country
    fn mapped_shade(&self, lat: f64, lon: f64) -> Option<u8> {
        let calibration = self.geocoder.calibration();
        if !calibration.contains(lat, lon) {
            return None;
        }
        let pixel = calibration.project(lat, normalize_lon(lon));
        let shade = self
            .resources
            .raster
            .sample(calibration.wrap_x(pixel.x), pixel.y)?;
        self.resources.table.get(shade).map(|_| shade)
    }
}
