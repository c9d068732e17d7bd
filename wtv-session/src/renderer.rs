//! View sinks.
//!
//! A renderer paints what the projectors describe. It never hands anything
//! back to the session except through new [`crate::Interaction`] events.

use crate::state::Viewport;
use serde::Serialize;
use std::io::{self, Write};
use wtv_data::{ChartPanel, MarkerSet};

/// One-way sink for derived views.
pub trait ViewRenderer {
    fn render_map(&mut self, markers: &MarkerSet, viewport: &Viewport) -> io::Result<()>;

    fn render_charts(&mut self, panel: &ChartPanel) -> io::Result<()>;
}

#[derive(Serialize)]
struct MapFrame<'a> {
    view: &'static str,
    viewport: &'a Viewport,
    #[serde(flatten)]
    markers: &'a MarkerSet,
}

#[derive(Serialize)]
struct ChartsFrame<'a> {
    view: &'static str,
    #[serde(flatten)]
    panel: &'a ChartPanel,
}

/// Writes each view as one JSON document per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame<T: Serialize>(&mut self, frame: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> ViewRenderer for JsonRenderer<W> {
    fn render_map(&mut self, markers: &MarkerSet, viewport: &Viewport) -> io::Result<()> {
        self.write_frame(&MapFrame {
            view: "map",
            viewport,
            markers,
        })
    }

    fn render_charts(&mut self, panel: &ChartPanel) -> io::Result<()> {
        self.write_frame(&ChartsFrame {
            view: "charts",
            panel,
        })
    }
}
