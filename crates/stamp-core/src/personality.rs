//! The six personality categories and their immutable reference data.
//!
//! Categories form a closed set. Every piece of presentation data (display
//! name, traits, sigil geometry, colour theme) hangs off an exhaustive match,
//! so a category without a profile cannot exist. Stored keys are parsed at the
//! boundary with [`Category::resolve`].

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Category ────────────────────────────────────────────────────────────────

/// A personality category. Declaration order is significant: it is the
/// tie-break order used by [`crate::scoring::score`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  Architect,
  Visionary,
  Artisan,
  Catalyst,
  Harmonizer,
  Innovator,
}

impl Category {
  /// Every category, in declaration order.
  pub const ALL: [Category; 6] = [
    Category::Architect,
    Category::Visionary,
    Category::Artisan,
    Category::Catalyst,
    Category::Harmonizer,
    Category::Innovator,
  ];

  /// Position of this category in [`Category::ALL`].
  pub fn index(self) -> usize { self as usize }

  /// The stored key, e.g. `"architect"`.
  pub fn key(self) -> &'static str { self.into() }

  /// Parse a stored key strictly.
  pub fn parse(key: &str) -> Result<Self> {
    key
      .parse()
      .map_err(|_| Error::UnknownCategory(key.to_owned()))
  }

  /// Resolve a possibly-missing stored key, defaulting to
  /// [`Category::Architect`] when it is absent or unrecognised.
  pub fn resolve(key: Option<&str>) -> Self {
    key
      .and_then(|k| Self::parse(k).ok())
      .unwrap_or(Category::Architect)
  }

  /// The reference profile for this category.
  pub fn profile(self) -> &'static Profile {
    match self {
      Category::Architect => &ARCHITECT,
      Category::Visionary => &VISIONARY,
      Category::Artisan => &ARTISAN,
      Category::Catalyst => &CATALYST,
      Category::Harmonizer => &HARMONIZER,
      Category::Innovator => &INNOVATOR,
    }
  }
}

// ─── Presentation data ───────────────────────────────────────────────────────

/// A two-stop gradient used for the card header and the sigil disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorTheme {
  pub from: &'static str,
  pub to:   &'static str,
}

/// One stroke or fill of a sigil, drawn on a 100×100 canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SigilMark {
  /// A filled path.
  Fill { d: &'static str },
  /// An unfilled path stroked with the given width.
  Stroke { d: &'static str, width: f32 },
  /// A circle centred on the canvas, stroked with the given width.
  Ring { r: f32, width: f32 },
  /// A straight stroke.
  Line {
    x1:    f32,
    y1:    f32,
    x2:    f32,
    y2:    f32,
    width: f32,
  },
}

/// Immutable reference data for a category.
#[derive(Debug, Serialize)]
pub struct Profile {
  pub id:           Category,
  pub display_name: &'static str,
  pub description:  &'static str,
  pub traits:       [&'static str; 4],
  pub sigil:        &'static [SigilMark],
  pub color:        ColorTheme,
}

static ARCHITECT: Profile = Profile {
  id:           Category::Architect,
  display_name: "The Architect",
  description:  "You are methodical, structured, and detail-oriented. You excel \
                 at planning and executing complex projects with precision.",
  traits:       ["Organized", "Analytical", "Strategic", "Systematic"],
  sigil:        &[SigilMark::Stroke {
    d:     "M20 80 L50 20 L80 80 M30 65 L70 65 M35 50 L65 50",
    width: 4.0,
  }],
  color:        ColorTheme { from: "#2563eb", to: "#4f46e5" },
};

static VISIONARY: Profile = Profile {
  id:           Category::Visionary,
  display_name: "The Visionary",
  description:  "You are innovative, intuitive, and future-focused. You see \
                 possibilities others miss and thrive on creative \
                 experimentation.",
  traits:       ["Innovative", "Intuitive", "Bold", "Experimental"],
  sigil:        &[
    SigilMark::Ring { r: 30.0, width: 4.0 },
    SigilMark::Ring { r: 20.0, width: 3.0 },
    SigilMark::Ring { r: 10.0, width: 2.0 },
  ],
  color:        ColorTheme { from: "#9333ea", to: "#db2777" },
};

static ARTISAN: Profile = Profile {
  id:           Category::Artisan,
  display_name: "The Artisan",
  description:  "You are hands-on, practical, and skilled. You create with your \
                 hands and heart, blending craft with creativity.",
  traits:       ["Practical", "Skillful", "Detail-focused", "Patient"],
  sigil:        &[SigilMark::Fill {
    d: "M50 20 L80 50 L50 80 L20 50 Z M50 35 L65 50 L50 65 L35 50 Z",
  }],
  color:        ColorTheme { from: "#d97706", to: "#ea580c" },
};

static CATALYST: Profile = Profile {
  id:           Category::Catalyst,
  display_name: "The Catalyst",
  description:  "You are energetic, spontaneous, and inspiring. You spark \
                 creativity in others and thrive in dynamic environments.",
  traits:       ["Energetic", "Spontaneous", "Inspiring", "Adaptable"],
  sigil:        &[SigilMark::Fill {
    d: "M50 10 L60 40 L90 40 L65 60 L75 90 L50 70 L25 90 L35 60 L10 40 L40 40 Z",
  }],
  color:        ColorTheme { from: "#dc2626", to: "#e11d48" },
};

static HARMONIZER: Profile = Profile {
  id:           Category::Harmonizer,
  display_name: "The Harmonizer",
  description:  "You are empathetic, collaborative, and people-focused. You \
                 create work that connects deeply with human emotions.",
  traits:       ["Empathetic", "Collaborative", "Emotional", "Supportive"],
  sigil:        &[SigilMark::Fill {
    d: "M50 20 Q70 30 70 50 Q70 70 50 80 Q30 70 30 50 Q30 30 50 20 \
        M50 35 Q60 40 60 50 Q60 60 50 65 Q40 60 40 50 Q40 40 50 35",
  }],
  color:        ColorTheme { from: "#16a34a", to: "#059669" },
};

static INNOVATOR: Profile = Profile {
  id:           Category::Innovator,
  display_name: "The Innovator",
  description:  "You are tech-savvy, forward-thinking, and problem-solving. You \
                 use creativity to solve complex challenges.",
  traits:       ["Tech-savvy", "Problem-solver", "Forward-thinking", "Logical"],
  sigil:        &[
    SigilMark::Ring { r: 25.0, width: 4.0 },
    SigilMark::Line { x1: 50.0, y1: 15.0, x2: 50.0, y2: 35.0, width: 4.0 },
    SigilMark::Line { x1: 50.0, y1: 65.0, x2: 50.0, y2: 85.0, width: 4.0 },
    SigilMark::Line { x1: 15.0, y1: 50.0, x2: 35.0, y2: 50.0, width: 4.0 },
    SigilMark::Line { x1: 65.0, y1: 50.0, x2: 85.0, y2: 50.0, width: 4.0 },
  ],
  color:        ColorTheme { from: "#0891b2", to: "#2563eb" },
};
