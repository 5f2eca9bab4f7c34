use thiserror::Error;

use crate::geometry::Rgba;
use crate::model::BackgroundType;

/// Fill used when a background value cannot be interpreted.
pub const FALLBACK_BACKGROUND: Rgba = Rgba::rgb(0x18, 0x18, 0x1b);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackgroundError {
    #[error("not a color: {0}")]
    InvalidColor(String),
    #[error("not a linear-gradient: {0}")]
    InvalidGradient(String),
    #[error("not an image reference: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: Rgba,
    /// Position along the gradient line, 0.0..=1.0.
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// CSS angle: 0 points up, 90 points right.
    pub angle_degrees: f64,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Start and end of the CSS gradient line for a `width` x `height` box.
    pub fn line(&self, width: f64, height: f64) -> ((f64, f64), (f64, f64)) {
        let radians = self.angle_degrees.to_radians();
        let (dx, dy) = (radians.sin(), -radians.cos());
        let half_length = (width * dx.abs() + height * dy.abs()) / 2.0;
        let (cx, cy) = (width / 2.0, height / 2.0);
        (
            (cx - dx * half_length, cy - dy * half_length),
            (cx + dx * half_length, cy + dy * half_length),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(Rgba),
    Gradient(LinearGradient),
    /// Image drawn with cover semantics; holds the `url(...)` target.
    Image(String),
}

/// Interprets `value` under `kind`, falling back to a neutral fill.
pub fn resolve_background(kind: BackgroundType, value: &str) -> Background {
    match parse_background(kind, value) {
        Ok(background) => background,
        Err(err) => {
            tracing::warn!(
                kind = kind.as_str(),
                value,
                %err,
                "background value does not match its type; using fallback fill"
            );
            Background::Solid(FALLBACK_BACKGROUND)
        }
    }
}

pub fn parse_background(kind: BackgroundType, value: &str) -> Result<Background, BackgroundError> {
    match kind {
        BackgroundType::Solid => parse_css_color(value)
            .map(Background::Solid)
            .ok_or_else(|| BackgroundError::InvalidColor(value.to_string())),
        BackgroundType::Gradient => parse_linear_gradient(value).map(Background::Gradient),
        BackgroundType::Image => parse_image_reference(value).map(Background::Image),
    }
}

pub fn parse_css_color(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if value.starts_with('#') {
        return Rgba::parse_hex(value);
    }

    let lowered = value.to_ascii_lowercase();
    match lowered.as_str() {
        "black" => return Some(Rgba::BLACK),
        "white" => return Some(Rgba::WHITE),
        "transparent" => return Some(Rgba::BLACK.with_alpha(0.0)),
        _ => {}
    }

    let args = lowered
        .strip_prefix("rgba(")
        .or_else(|| lowered.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts = args.split(',').map(str::trim).collect::<Vec<_>>();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |part: &str| part.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
    let color = Rgba::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    match parts.get(3) {
        Some(alpha) => Some(color.with_alpha(alpha.parse::<f64>().ok()?.clamp(0.0, 1.0))),
        None => Some(color),
    }
}

pub fn parse_linear_gradient(value: &str) -> Result<LinearGradient, BackgroundError> {
    let invalid = || BackgroundError::InvalidGradient(value.to_string());
    let body = value
        .trim()
        .strip_prefix("linear-gradient(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut args = split_top_level(body);
    let angle_degrees = match args.first().and_then(|first| parse_direction(first)) {
        Some(angle) => {
            args.remove(0);
            angle
        }
        None => 180.0,
    };

    let mut parsed = Vec::with_capacity(args.len());
    for arg in &args {
        parsed.push(parse_color_stop(arg).ok_or_else(invalid)?);
    }
    if parsed.len() < 2 {
        return Err(invalid());
    }

    Ok(LinearGradient {
        angle_degrees,
        stops: distribute_offsets(parsed),
    })
}

fn parse_image_reference(value: &str) -> Result<String, BackgroundError> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| BackgroundError::InvalidImage(value.to_string()))?
        .trim()
        .trim_matches(|ch| ch == '"' || ch == '\'');
    if inner.is_empty() {
        return Err(BackgroundError::InvalidImage(value.to_string()));
    }
    Ok(inner.to_string())
}

fn parse_direction(arg: &str) -> Option<f64> {
    let arg = arg.trim().to_ascii_lowercase();
    if let Some(degrees) = arg.strip_suffix("deg") {
        return degrees.trim().parse::<f64>().ok();
    }
    let side = arg.strip_prefix("to ")?;
    let angle = match side.trim() {
        "top" => 0.0,
        "top right" | "right top" => 45.0,
        "right" => 90.0,
        "bottom right" | "right bottom" => 135.0,
        "bottom" => 180.0,
        "bottom left" | "left bottom" => 225.0,
        "left" => 270.0,
        "top left" | "left top" => 315.0,
        _ => return None,
    };
    Some(angle)
}

fn parse_color_stop(arg: &str) -> Option<(Rgba, Option<f64>)> {
    let arg = arg.trim();
    // Position, if any, follows the last closing parenthesis or the first space.
    let split_at = match arg.rfind(')') {
        Some(index) => index + 1,
        None => arg.find(char::is_whitespace).unwrap_or(arg.len()),
    };
    let (color, position) = arg.split_at(split_at);
    let color = parse_css_color(color)?;
    let position = position.trim();
    if position.is_empty() {
        return Some((color, None));
    }
    let percent = position.strip_suffix('%')?.trim().parse::<f64>().ok()?;
    Some((color, Some(percent / 100.0)))
}

/// CSS stop fixup: first and last default to the ends, gaps are spread evenly,
/// and positions never run backwards.
fn distribute_offsets(stops: Vec<(Rgba, Option<f64>)>) -> Vec<ColorStop> {
    let count = stops.len();
    let mut offsets = stops.iter().map(|(_, offset)| *offset).collect::<Vec<_>>();
    if offsets[0].is_none() {
        offsets[0] = Some(0.0);
    }
    if offsets[count - 1].is_none() {
        offsets[count - 1] = Some(1.0);
    }

    let mut max_seen = 0.0_f64;
    for offset in offsets.iter_mut().flatten() {
        max_seen = max_seen.max(*offset);
        *offset = max_seen;
    }

    let mut index = 0;
    while index < count {
        if offsets[index].is_some() {
            index += 1;
            continue;
        }
        let start = index - 1;
        let mut end = index;
        while offsets[end].is_none() {
            end += 1;
        }
        let from = offsets[start].unwrap_or(0.0);
        let to = offsets[end].unwrap_or(1.0);
        let span = (end - start) as f64;
        for (step, slot) in offsets.iter_mut().enumerate().take(end).skip(index) {
            *slot = Some(from + (to - from) * (step - start) as f64 / span);
        }
        index = end;
    }

    stops
        .into_iter()
        .zip(offsets)
        .map(|((color, _), offset)| ColorStop {
            color,
            offset: offset.unwrap_or(0.0).clamp(0.0, 1.0),
        })
        .collect()
}

fn split_top_level(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0_u32;
    let mut current = String::new();
    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}
