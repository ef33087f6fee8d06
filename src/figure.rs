//! Backend-independent scene model
//!
//! Chart components describe what to draw as a [`Figure`]: a pixel canvas split
//! into [`Panel`]s, each with its own data-coordinate range and an ordered list
//! of [`Primitive`]s. Draw order is z-order. The rasterizer in
//! [`crate::render`] turns a figure into pixels.

use image::Rgba;

/// A point in a panel's data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Rectangular region of data space, used by rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Thin,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    Circle,
    /// Points right at 0 degrees; positive rotation turns clockwise on screen.
    Triangle { rotation_degrees: f64 },
    /// White ball with a dark center patch and outline.
    Football,
}

/// One drawable element. Sizes (`width`, `size`) are in points; positions and
/// circle radii are in panel data units.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Rgba<u8>,
        width: f32,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgba<u8>,
        width: f32,
    },
    Arrow {
        from: Point,
        to: Point,
        color: Rgba<u8>,
        width: f32,
    },
    /// Line whose width and opacity grow from `from` to `to`.
    Comet {
        from: Point,
        to: Point,
        color: Rgba<u8>,
        width: f32,
    },
    Polygon {
        points: Vec<Point>,
        fill: Option<Rgba<u8>>,
        edge: Option<Rgba<u8>>,
        edge_width: f32,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Rgba<u8>>,
        edge: Option<Rgba<u8>>,
    },
    Marker {
        at: Point,
        shape: MarkerShape,
        size: f32,
        fill: Rgba<u8>,
        edge: Rgba<u8>,
    },
    Text {
        at: Point,
        text: String,
        size: f32,
        color: Rgba<u8>,
        weight: FontWeight,
        h_align: HAlign,
        v_align: VAlign,
    },
    /// Colored grid covering `extent`; row 0 sits at `y_min`.
    Raster {
        extent: Extent,
        cols: usize,
        rows: usize,
        cells: Vec<Option<Rgba<u8>>>,
    },
}

impl Primitive {
    /// Short kind name, handy for assertions and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Line { .. } => "line",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Arrow { .. } => "arrow",
            Primitive::Comet { .. } => "comet",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Circle { .. } => "circle",
            Primitive::Marker { .. } => "marker",
            Primitive::Text { .. } => "text",
            Primitive::Raster { .. } => "raster",
        }
    }
}

/// Fractional placement of a panel inside the figure (0..1, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelRect {
    pub const FULL: PanelRect = PanelRect {
        left: 0.0,
        top: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub name: String,
    pub rect: PanelRect,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Data y grows downward on screen (StatsBomb pitches).
    pub y_down: bool,
    pub primitives: Vec<Primitive>,
}

impl Panel {
    pub fn new(name: &str, rect: PanelRect, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            rect,
            x_range,
            y_range,
            y_down: false,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Count primitives of a given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.primitives.iter().filter(|p| p.kind() == kind).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Used as the file name prefix when the figure is written out.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Pixels per inch; point sizes convert at `dpi / 72`.
    pub dpi: f32,
    pub background: Rgba<u8>,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn new(name: &str, width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            dpi: 100.0,
            background,
            panels: Vec::new(),
        }
    }

    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name == name)
    }

    pub fn panel_mut(&mut self, name: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.name == name)
    }

    pub fn has_text(&self) -> bool {
        self.panels
            .iter()
            .flat_map(|p| p.primitives.iter())
            .any(|p| matches!(p, Primitive::Text { .. }))
    }
}
