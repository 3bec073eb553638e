// ---------------------------------------------------------------------------
// Shared chart styling
// ---------------------------------------------------------------------------

pub const TITLE_FONT_SIZE: f32 = 24.0;
pub const BOX_TITLE_FONT_SIZE: f32 = 22.0;
pub const TICK_FONT_SIZE: f32 = 12.0;
pub const TEXT_FONT_SIZE: f32 = 12.0;
/// Category tick labels are drawn vertically.
pub const CATEGORY_TICK_ANGLE: f32 = 90.0;

pub const MARKER_SIZE: f32 = 11.0;
pub const MARKER_OPACITY: f32 = 0.5;

/// Box width as a fraction of the category slot.
pub const BOX_WIDTH: f64 = 0.8;
/// Half of the widest violin, in category-slot units.
pub const VIOLIN_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margin {
    pub const BAR: Margin = Margin { top: 100.0, bottom: 40.0, left: 40.0, right: 40.0 };
    pub const BOX: Margin = Margin { top: 5.0, bottom: 40.0, left: 40.0, right: 40.0 };
    pub const DEFAULT: Margin = Margin { top: 80.0, bottom: 40.0, left: 40.0, right: 40.0 };
}

/// Everything the renderer needs besides the marks.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub margin: Margin,
    pub title_font_size: f32,
    pub tick_font_size: f32,
    pub text_font_size: f32,
    /// Rotation of category tick labels; `0.0` for numeric axes.
    pub x_tick_angle: f32,
    pub x_title: String,
    pub y_title: String,
    pub marker_size: f32,
    pub marker_opacity: f32,
    pub show_legend: bool,
}

impl Layout {
    /// 1000×500 canvas with centred 24pt title and 12pt ticks.
    pub fn standard(x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        Layout {
            width: 1000.0,
            height: 500.0,
            margin: Margin::DEFAULT,
            title_font_size: TITLE_FONT_SIZE,
            tick_font_size: TICK_FONT_SIZE,
            text_font_size: TEXT_FONT_SIZE,
            x_tick_angle: 0.0,
            x_title: x_title.into(),
            y_title: y_title.into(),
            marker_size: MARKER_SIZE,
            marker_opacity: MARKER_OPACITY,
            show_legend: false,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_category_axis(mut self) -> Self {
        self.x_tick_angle = CATEGORY_TICK_ANGLE;
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }
}

/// Axis title for a view column: `genre_name` → `Genre`, counts → `Count`.
pub fn axis_title(field: &str) -> String {
    if field == "show_id" || field == "count" {
        return "Count".to_string();
    }
    let base = field.strip_suffix("_name").unwrap_or(field);
    base.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
