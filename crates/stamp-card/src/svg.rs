//! SVG card writer.
//!
//! Output is a fixed 420×640 layout. Text goes through quick-xml's escaping,
//! so user-entered fields cannot break the document.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use stamp_core::personality::{Profile, SigilMark};

use crate::{Card, SERIAL, long_date, sex_label, species_label};

const NS_SVG: &str = "http://www.w3.org/2000/svg";

const WIDTH: &str = "420";
const HEIGHT: &str = "640";

const INK: &str = "#111827";
const MUTED: &str = "#6b7280";
const BORDER: &str = "#e5e7eb";

type W = Writer<Cursor<Vec<u8>>>;

/// Render `card` as a standalone SVG document.
pub fn render(card: &Card<'_>) -> Vec<u8> {
  let profile = card.category.profile();
  let record = card.record;
  let mut w = Writer::new(Cursor::new(Vec::new()));

  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .unwrap();

  let mut root = BytesStart::new("svg");
  root.push_attribute(("xmlns", NS_SVG));
  root.push_attribute(("width", WIDTH));
  root.push_attribute(("height", HEIGHT));
  root.push_attribute(("viewBox", "0 0 420 640"));
  root.push_attribute(("font-family", "Helvetica, Arial, sans-serif"));
  w.write_event(Event::Start(root)).unwrap();

  write_gradient(&mut w, profile);

  write_empty(&mut w, "rect", &[
    ("width", WIDTH),
    ("height", HEIGHT),
    ("rx", "24"),
    ("fill", "#ffffff"),
    ("stroke", BORDER),
  ]);

  // Header band.
  write_empty(&mut w, "rect", &[
    ("width", WIDTH),
    ("height", "90"),
    ("rx", "24"),
    ("fill", "url(#theme)"),
  ]);
  write_text(&mut w, "PERSONALITY STAMP", &[
    ("x", "210"),
    ("y", "44"),
    ("text-anchor", "middle"),
    ("font-size", "24"),
    ("font-weight", "bold"),
    ("fill", "#ffffff"),
  ]);
  write_text(&mut w, "Official Digital Identity", &[
    ("x", "210"),
    ("y", "70"),
    ("text-anchor", "middle"),
    ("font-size", "13"),
    ("fill", "#ffffff"),
  ]);

  write_photo(&mut w, card.selfie_href);

  let dob = long_date(record.date_of_birth);
  let id_number = record.id.id_number();
  write_field(&mut w, 170, 130, "Full Name", &record.name);
  write_field(&mut w, 170, 180, "Date of Birth", &dob);
  write_field(&mut w, 170, 230, "Nationality", &record.nationality);
  write_field(&mut w, 30, 300, "Sex", sex_label(record.sex));
  write_field(&mut w, 170, 300, "Human/Robot", species_label(record.species));
  write_field(&mut w, 30, 350, "ID Number", &id_number);

  write_sigil(&mut w, profile);

  write_text(&mut w, profile.display_name, &[
    ("x", "210"),
    ("y", "540"),
    ("text-anchor", "middle"),
    ("font-size", "20"),
    ("font-weight", "bold"),
    ("fill", INK),
  ]);
  write_text(&mut w, "Verified Stamp", &[
    ("x", "210"),
    ("y", "562"),
    ("text-anchor", "middle"),
    ("font-size", "12"),
    ("fill", MUTED),
  ]);

  // Footer.
  write_empty(&mut w, "line", &[
    ("x1", "30"),
    ("y1", "585"),
    ("x2", "390"),
    ("y2", "585"),
    ("stroke", BORDER),
  ]);
  let issued = format!("Issued {}", long_date(card.issued_on));
  write_text(&mut w, &issued, &[
    ("x", "30"),
    ("y", "612"),
    ("font-size", "11"),
    ("fill", MUTED),
  ]);
  write_text(&mut w, SERIAL, &[
    ("x", "390"),
    ("y", "612"),
    ("text-anchor", "end"),
    ("font-size", "11"),
    ("font-family", "monospace"),
    ("fill", MUTED),
  ]);

  write_end(&mut w, "svg");
  w.into_inner().into_inner()
}

// ─── Sections ────────────────────────────────────────────────────────────────

fn write_gradient(w: &mut W, profile: &Profile) {
  write_start(w, "defs", &[]);
  write_start(w, "linearGradient", &[
    ("id", "theme"),
    ("x1", "0"),
    ("y1", "0"),
    ("x2", "1"),
    ("y2", "1"),
  ]);
  write_empty(w, "stop", &[("offset", "0"), ("stop-color", profile.color.from)]);
  write_empty(w, "stop", &[("offset", "1"), ("stop-color", profile.color.to)]);
  write_end(w, "linearGradient");
  write_end(w, "defs");
}

fn write_photo(w: &mut W, href: Option<&str>) {
  let frame = [
    ("x", "30"),
    ("y", "110"),
    ("width", "120"),
    ("height", "150"),
    ("rx", "8"),
  ];
  match href {
    Some(href) => {
      write_empty(w, "image", &[
        ("href", href),
        ("x", "30"),
        ("y", "110"),
        ("width", "120"),
        ("height", "150"),
        ("preserveAspectRatio", "xMidYMid slice"),
      ]);
      let mut outline = frame.to_vec();
      outline.extend([("fill", "none"), ("stroke", BORDER)]);
      write_empty(w, "rect", &outline);
    }
    None => {
      let mut placeholder = frame.to_vec();
      placeholder.extend([("fill", "#f3f4f6"), ("stroke", BORDER)]);
      write_empty(w, "rect", &placeholder);
      write_text(w, "No photo", &[
        ("x", "90"),
        ("y", "190"),
        ("text-anchor", "middle"),
        ("font-size", "12"),
        ("fill", MUTED),
      ]);
    }
  }
}

/// A small grey label with the value underneath.
fn write_field(w: &mut W, x: u32, y: u32, label: &str, value: &str) {
  let x = x.to_string();
  let label_y = y.to_string();
  let value_y = (y + 20).to_string();
  write_text(w, label, &[
    ("x", x.as_str()),
    ("y", label_y.as_str()),
    ("font-size", "11"),
    ("fill", MUTED),
  ]);
  write_text(w, value, &[
    ("x", x.as_str()),
    ("y", value_y.as_str()),
    ("font-size", "15"),
    ("font-weight", "600"),
    ("fill", INK),
  ]);
}

/// The sigil's 100×100 canvas, scaled into a gradient disc.
fn write_sigil(w: &mut W, profile: &Profile) {
  write_empty(w, "circle", &[
    ("cx", "210"),
    ("cy", "445"),
    ("r", "60"),
    ("fill", "url(#theme)"),
  ]);
  write_start(w, "g", &[
    ("transform", "translate(170 405) scale(0.8)"),
    ("fill", "none"),
    ("stroke", "#ffffff"),
    ("stroke-linecap", "round"),
    ("stroke-linejoin", "round"),
  ]);
  for mark in profile.sigil {
    write_mark(w, mark);
  }
  write_end(w, "g");
}

fn write_mark(w: &mut W, mark: &SigilMark) {
  match *mark {
    SigilMark::Fill { d } => {
      write_empty(w, "path", &[("d", d), ("fill", "#ffffff"), ("stroke", "none")]);
    }
    SigilMark::Stroke { d, width } => {
      let width = width.to_string();
      write_empty(w, "path", &[("d", d), ("stroke-width", width.as_str())]);
    }
    SigilMark::Ring { r, width } => {
      let (r, width) = (r.to_string(), width.to_string());
      write_empty(w, "circle", &[
        ("cx", "50"),
        ("cy", "50"),
        ("r", r.as_str()),
        ("stroke-width", width.as_str()),
      ]);
    }
    SigilMark::Line { x1, y1, x2, y2, width } => {
      let coords = [x1, y1, x2, y2, width].map(|v| v.to_string());
      write_empty(w, "line", &[
        ("x1", coords[0].as_str()),
        ("y1", coords[1].as_str()),
        ("x2", coords[2].as_str()),
        ("y2", coords[3].as_str()),
        ("stroke-width", coords[4].as_str()),
      ]);
    }
  }
}

// ─── XML writer helpers ──────────────────────────────────────────────────────

fn element<'a>(tag: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  el
}

fn write_start(w: &mut W, tag: &str, attrs: &[(&str, &str)]) {
  w.write_event(Event::Start(element(tag, attrs))).unwrap();
}

fn write_end(w: &mut W, tag: &str) {
  w.write_event(Event::End(BytesEnd::new(tag))).unwrap();
}

fn write_empty(w: &mut W, tag: &str, attrs: &[(&str, &str)]) {
  w.write_event(Event::Empty(element(tag, attrs))).unwrap();
}

fn write_text(w: &mut W, text: &str, attrs: &[(&str, &str)]) {
  write_start(w, "text", attrs);
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
  write_end(w, "text");
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use stamp_core::{
    personality::Category,
    user::{NewUser, Sex, Species, UserId, UserRecord},
  };

  use super::*;

  fn record(name: &str) -> UserRecord {
    let mut record = UserRecord::create(
      UserId::new("3f2a9c1e-77b4-4d0e-9a51-0c6f1d2e8b7a"),
      NewUser {
        name:          name.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 4).unwrap(),
        nationality:   "Canadian".into(),
        sex:           Sex::NonBinary,
        species:       Species::Robot,
      },
      Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    );
    record.personality_type = Some("catalyst".into());
    record
  }

  fn issued() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 6, 2).unwrap() }

  fn render_str(card: &Card<'_>) -> String {
    String::from_utf8(render(card)).unwrap()
  }

  #[test]
  fn card_prints_every_field() {
    let r = record("Sam Rivera");
    let svg = render_str(&Card::new(&r, issued()));

    for expected in [
      "PERSONALITY STAMP",
      "Official Digital Identity",
      "Sam Rivera",
      "March 4, 1990",
      "Canadian",
      "Non-binary",
      "Robot",
      "3F2A9C1E-77B4-4D",
      "The Catalyst",
      "Verified Stamp",
      "Issued June 2, 2025",
      "PS-2025-OFFICIAL",
      "No photo",
    ] {
      assert!(svg.contains(expected), "missing {expected:?}");
    }
    // Catalyst gradient.
    assert!(svg.contains("#dc2626"));
    assert!(svg.contains("#e11d48"));
    assert!(svg.starts_with("<?xml"));
  }

  #[test]
  fn selfie_replaces_placeholder() {
    let r = record("Sam Rivera");
    let card = Card::new(&r, issued()).with_selfie("https://cdn.example/s.jpg");
    let svg = render_str(&card);
    assert!(svg.contains(r#"href="https://cdn.example/s.jpg""#));
    assert!(!svg.contains("No photo"));
  }

  #[test]
  fn user_text_is_escaped() {
    let r = record("<b>Bobby</b> & \"Tables\"");
    let svg = render_str(&Card::new(&r, issued()));
    assert!(!svg.contains("<b>"));
    assert!(svg.contains("&lt;b&gt;Bobby&lt;/b&gt; &amp;"));
  }

  #[test]
  fn unknown_stored_type_renders_as_architect() {
    let mut r = record("Sam Rivera");
    r.personality_type = Some("wizard".into());
    let card = Card::new(&r, issued());
    assert_eq!(card.category, Category::Architect);
    assert!(render_str(&card).contains("The Architect"));
  }

  #[test]
  fn every_category_draws_its_sigil() {
    let mut r = record("Sam Rivera");
    for category in Category::ALL {
      r.personality_type = Some(category.key().into());
      let svg = render_str(&Card::new(&r, issued()));
      let profile = category.profile();
      assert!(svg.contains(profile.display_name));
      assert!(svg.contains(profile.color.from));
      assert!(svg.contains("translate(170 405) scale(0.8)"));
    }
  }
}
