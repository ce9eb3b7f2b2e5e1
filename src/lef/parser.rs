// SPDX-License-Identifier: MIT

//! Tolerant LEF parser.
//!
//! The file is a sequence of `KEYWORD name ... END name` blocks. Named
//! blocks are extracted with a depth-tracked scanner keyed on the
//! keyword/name pair, so `MACRO X ... END X` matches its own `END`
//! even when the body happens to contain the same token sequence.
//! Malformed lines are logged and skipped; parsing never fails.

use log::warn;
use nom::Parser;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, space1},
    combinator::opt,
    number::complete::double,
    IResult,
};

use super::{Lef, LefAntenna, LefBlock, LefForeign, LefMacro, LefPin, LefPort, LefRect, LefVia};
use crate::interner::{NameId, NameInterner};

/// Parse one library file. Never fails: unrecognized or malformed
/// content is skipped and scanning resumes at the next keyword.
pub fn parse_lef(text: &str, names: &NameInterner) -> Lef {
    let lines: Vec<&str> = text.lines().map(strip_comment).collect();
    let mut sc = Scanner::new(lines);
    let mut lef = Lef::default();

    while let Some(line) = sc.next_line() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "MACRO" if tokens.len() > 1 => {
                let name = tokens[1];
                if let Some(body) = sc.scan_named_block("MACRO", name) {
                    let id = names.intern(name);
                    lef.macros.insert(id, parse_macro(body, id, name, names));
                }
            }
            "SITE" if tokens.len() > 1 => {
                let name = tokens[1];
                if let Some(body) = sc.scan_named_block("SITE", name) {
                    lef.sites.insert(name.to_string(), raw_block(name, &body));
                }
            }
            "LAYER" if tokens.len() > 1 => {
                let name = tokens[1];
                if let Some(body) = sc.scan_named_block("LAYER", name) {
                    lef.layers.insert(name.to_string(), raw_block(name, &body));
                }
            }
            "VIA" if tokens.len() > 1 => {
                let name = tokens[1];
                if let Some(body) = sc.scan_named_block("VIA", name) {
                    lef.vias.insert(
                        name.to_string(),
                        LefVia {
                            name: name.to_string(),
                            shapes: extract_layer_shapes(&body),
                            source: body.join("\n"),
                        },
                    );
                }
            }
            "VIARULE" if tokens.len() > 1 => {
                let name = tokens[1];
                if let Some(body) = sc.scan_named_block("VIARULE", name) {
                    lef.via_rules
                        .insert(name.to_string(), raw_block(name, &body));
                }
            }
            "PROPERTYDEFINITIONS" => {
                parse_property_definitions(&mut sc, &mut lef);
            }
            _ => {}
        }
    }

    lef
}

struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(lines: Vec<&'a str>) -> Self {
        Self { lines, pos: 0 }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// Consume lines up to the matching `END name`, tracking the depth
    /// of nested `keyword name` openings. Returns the body without the
    /// terminator, or `None` (position unchanged) when no terminator
    /// exists, so scanning resumes right after the orphaned header.
    fn scan_named_block(&mut self, keyword: &str, name: &str) -> Option<Vec<&'a str>> {
        let start = self.pos;
        let mut depth = 1usize;
        let mut i = start;
        while i < self.lines.len() {
            let mut t = self.lines[i].split_whitespace();
            match (t.next(), t.next()) {
                (Some(k), Some(n)) if k == keyword && n == name => depth += 1,
                (Some("END"), Some(n)) if n == name => {
                    depth -= 1;
                    if depth == 0 {
                        let body = self.lines[start..i].to_vec();
                        self.pos = i + 1;
                        return Some(body);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        warn!("LEF: unterminated block {keyword} {name}; skipping its header");
        None
    }

    /// Consume lines up to a bare `END` terminator (PORT/OBS style). A
    /// named `END <x>` stops the scan but is left for the enclosing
    /// scanner, which keeps a missing terminator from swallowing the
    /// rest of the pin or macro.
    fn scan_to_end(&mut self) -> Vec<&'a str> {
        let start = self.pos;
        while self.pos < self.lines.len() {
            let mut t = self.lines[self.pos].split_whitespace();
            if t.next() == Some("END") {
                let body = self.lines[start..self.pos].to_vec();
                if t.next().is_none() {
                    self.pos += 1;
                }
                return body;
            }
            self.pos += 1;
        }
        self.lines[start..].to_vec()
    }
}

fn parse_macro(body: Vec<&str>, id: NameId, name: &str, names: &NameInterner) -> LefMacro {
    let mut sc = Scanner::new(body);
    let mut mac = LefMacro::new(id);

    while let Some(line) = sc.next_line() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "CLASS" => mac.class = scalar_field(&tokens),
            "SITE" => mac.site = scalar_field(&tokens),
            "SYMMETRY" => mac.symmetry = list_field(&tokens),
            "ORIGIN" => match coord_pair(&tokens) {
                Some((x, y)) => mac.origin = (x, y),
                None => warn!("LEF: malformed ORIGIN in macro {name}: {line}"),
            },
            "SIZE" => {
                // SIZE w BY h ;
                if tokens.len() >= 4 && tokens[2] == "BY" {
                    if let (Ok(w), Ok(h)) = (tokens[1].parse::<f64>(), tokens[3].parse::<f64>()) {
                        mac.size = Some((w, h));
                        continue;
                    }
                }
                warn!("LEF: malformed SIZE in macro {name}: {line}");
            }
            "FOREIGN" => {
                if tokens.len() >= 4 {
                    if let (Ok(x), Ok(y)) = (tokens[2].parse::<f64>(), tokens[3].parse::<f64>()) {
                        mac.foreign = Some(LefForeign {
                            cell: tokens[1].to_string(),
                            x,
                            y,
                        });
                        continue;
                    }
                }
                warn!("LEF: malformed FOREIGN in macro {name}: {line}");
            }
            "PIN" if tokens.len() > 1 => {
                let pin_name = tokens[1];
                if let Some(pin_body) = sc.scan_named_block("PIN", pin_name) {
                    mac.pins.insert(names.intern(pin_name), parse_pin(pin_body));
                }
            }
            "OBS" => {
                let obs_body = sc.scan_to_end();
                mac.obs = extract_layer_shapes(&obs_body);
            }
            _ => {}
        }
    }

    mac
}

fn parse_pin(body: Vec<&str>) -> LefPin {
    let mut sc = Scanner::new(body);
    let mut pin = LefPin::default();

    while let Some(line) = sc.next_line() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "DIRECTION" => pin.direction = scalar_field(&tokens),
            "USE" => pin.use_type = scalar_field(&tokens),
            "GROUNDSENSITIVITY" => pin.ground_sensitivity = scalar_field(&tokens),
            "SUPPLYSENSITIVITY" => pin.supply_sensitivity = scalar_field(&tokens),
            "PORT" => {
                let port_body = sc.scan_to_end();
                pin.ports.push(LefPort {
                    shapes: extract_layer_shapes(&port_body),
                });
            }
            kw if kw.starts_with("ANTENNA") => match parse_antenna(&tokens) {
                Some(antenna) => pin.antennas.push(antenna),
                None => warn!("LEF: malformed antenna line: {line}"),
            },
            _ => {}
        }
    }

    pin
}

/// `ANTENNAKIND value [LAYER layer] ;` with trailing tokens tolerated.
fn parse_antenna(tokens: &[&str]) -> Option<LefAntenna> {
    if tokens.len() < 2 {
        return None;
    }
    let value = tokens[1].parse::<f64>().ok()?;
    let cleaned: Vec<&str> = tokens
        .iter()
        .map(|t| t.trim_end_matches(';'))
        .filter(|t| !t.is_empty())
        .collect();
    let layer = cleaned
        .iter()
        .position(|&t| t == "LAYER")
        .and_then(|i| cleaned.get(i + 1))
        .copied()
        .or_else(|| {
            if cleaned.len() > 2 {
                cleaned.last().copied()
            } else {
                None
            }
        })
        .unwrap_or("");
    Some(LefAntenna {
        kind: tokens[0].to_string(),
        value,
        layer: layer.to_string(),
    })
}

/// Walk a PORT/OBS/VIA body tracking the current `LAYER`, attaching
/// each `RECT` line to that layer's rectangle list.
fn extract_layer_shapes(lines: &[&str]) -> super::LayerShapes {
    let mut shapes = super::LayerShapes::new();
    let mut current: Option<String> = None;

    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "LAYER" if tokens.len() > 1 => {
                current = Some(tokens[1].trim_end_matches(';').to_string());
            }
            "RECT" => match &current {
                Some(layer) => match rect_line(line.trim_start()) {
                    Ok((_, rect)) => shapes.entry(layer.clone()).or_default().push(rect),
                    Err(_) => warn!("LEF: malformed RECT line: {line}"),
                },
                None => warn!("LEF: RECT before any LAYER: {line}"),
            },
            _ => {}
        }
    }

    shapes
}

fn rect_line(input: &str) -> IResult<&str, LefRect> {
    let (input, _) = tag("RECT")(input)?;
    let (input, _) = space1(input)?;
    let (input, xl) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, yl) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, xh) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, yh) = double(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(tag(";")).parse(input)?;
    Ok((input, LefRect { xl, yl, xh, yh }))
}

fn parse_property_definitions(sc: &mut Scanner<'_>, lef: &mut Lef) {
    while let Some(line) = sc.next_line() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"END") && tokens.get(1) == Some(&"PROPERTYDEFINITIONS") {
            return;
        }
        // Key is the object type plus property name, e.g. "MACRO maskLayoutSubType".
        if tokens.len() >= 3 {
            let key = format!("{} {}", tokens[0], tokens[1]);
            let value = tokens[2..].join(" ");
            lef.property_definitions
                .insert(key, value.trim_end_matches(';').trim().to_string());
        }
    }
}

fn raw_block(name: &str, body: &[&str]) -> LefBlock {
    LefBlock {
        name: name.to_string(),
        source: body.join("\n"),
    }
}

/// Everything between the keyword and the terminating semicolon.
fn scalar_field(tokens: &[&str]) -> Option<String> {
    let value = tokens[1..]
        .iter()
        .take_while(|&&t| t != ";")
        .map(|t| t.trim_end_matches(';'))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn list_field(tokens: &[&str]) -> Vec<String> {
    tokens[1..]
        .iter()
        .take_while(|&&t| t != ";")
        .map(|t| t.trim_end_matches(';'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn coord_pair(tokens: &[&str]) -> Option<(f64, f64)> {
    if tokens.len() >= 3 {
        if let (Ok(x), Ok(y)) = (tokens[1].parse::<f64>(), tokens[2].parse::<f64>()) {
            return Some((x, y));
        }
    }
    None
}

/// Comments run from a `#` preceded by whitespace (or at line start)
/// to the end of the line.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return &line[..i];
        }
    }
    line
}
