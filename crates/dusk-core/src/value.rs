/// A parsed declaration value.
///
/// Everything the recolorer can reach is one of these variants; anything the
/// grammar does not model is kept verbatim as a `Keyword` and passed through.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(Color),
    Size(Size),
    Keyword(String),
    List(List),
    Function(Function),
}

/// A color literal in the representation it was written in.
///
/// RGB channels are in 0..=255, hue in degrees, saturation and lightness as
/// percentages. Alpha, when present, is in 0..=1.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Rgb {
        r: f64,
        g: f64,
        b: f64,
        alpha: Option<f64>,
    },
    Hsl {
        h: f64,
        s: f64,
        l: f64,
        alpha: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Size {
    pub magnitude: f64,
    pub unit: Option<String>,
}

/// An ordered sequence of values joined by one separator.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub items: Vec<Value>,
    pub sep: Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Comma,
}

/// A functional notation such as `linear-gradient(...)`. Arguments are
/// comma-separated; a single argument may itself be a space list.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<Value>,
}

impl Color {
    pub fn alpha(&self) -> Option<f64> {
        match self {
            Color::Rgb { alpha, .. } | Color::Hsl { alpha, .. } => *alpha,
        }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb {
            r,
            g,
            b,
            alpha: None,
        }
    }

    pub fn hsl(h: f64, s: f64, l: f64) -> Self {
        Color::Hsl {
            h,
            s,
            l,
            alpha: None,
        }
    }
}

impl Size {
    pub fn new(magnitude: f64, unit: Option<&str>) -> Self {
        Self {
            magnitude,
            unit: unit.map(str::to_string),
        }
    }
}

impl From<Color> for Value {
    fn from(color: Color) -> Self {
        Value::Color(color)
    }
}
