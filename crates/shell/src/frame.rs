use crtpad_settings::{Color, ResolvedPalette};

use crate::width::fit;

/// Marker drawn at the start of every other content row.
pub const SCANLINE_MARKER: char = '░';
const MIN_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameColors {
    border: Color,
    text: Color,
    dim: Color,
}

/// Box-drawn terminal frame with a scanline overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtFrame {
    width: usize,
    scanlines: bool,
    colors: Option<FrameColors>,
}

impl CrtFrame {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            scanlines: true,
            colors: None,
        }
    }

    pub fn with_scanlines(mut self, enabled: bool) -> Self {
        self.scanlines = enabled;
        self
    }

    /// Paints the frame with 24-bit ANSI colours taken from `palette`.
    pub fn with_palette(mut self, palette: &ResolvedPalette) -> Self {
        self.colors = Some(FrameColors {
            border: palette.foreground,
            text: palette.foreground,
            dim: palette.line_number,
        });
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Columns available to a content row.
    pub fn inner_width(&self) -> usize {
        self.width - 3
    }

    pub fn render(&self, header: &str, rows: &[String], footer: &str) -> String {
        let rule = "═".repeat(self.width - 2);
        let divider = "─".repeat(self.width - 2);
        let mut out = Vec::with_capacity(rows.len() + 6);

        out.push(self.border(&format!("╔{rule}╗")));
        out.push(self.row(' ', header));
        out.push(self.border(&format!("╟{divider}╢")));
        for (index, row) in rows.iter().enumerate() {
            let marker = if self.scanlines && index % 2 == 1 {
                SCANLINE_MARKER
            } else {
                ' '
            };
            out.push(self.row(marker, row));
        }
        out.push(self.border(&format!("╟{divider}╢")));
        out.push(self.row(' ', footer));
        out.push(self.border(&format!("╚{rule}╝")));

        let mut frame = out.join("\n");
        frame.push('\n');
        frame
    }

    fn row(&self, marker: char, text: &str) -> String {
        let body = fit(text, self.inner_width());
        match self.colors {
            Some(colors) => format!(
                "{edge}{marker}{body}{edge}",
                edge = paint(colors.border, "║"),
                marker = paint(colors.dim, &marker.to_string()),
                body = paint(colors.text, &body),
            ),
            None => format!("║{marker}{body}║"),
        }
    }

    fn border(&self, line: &str) -> String {
        match self.colors {
            Some(colors) => paint(colors.border, line),
            None => line.to_string(),
        }
    }
}

fn paint(color: Color, text: &str) -> String {
    format!(
        "\x1b[38;2;{};{};{}m{}\x1b[0m",
        color.r, color.g, color.b, text
    )
}
