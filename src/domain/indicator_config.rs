//! Indicator and render configuration.
//!
//! Validates the `[indicator]` and `[render]` sections before anything is
//! computed, then builds the typed options from them.

use crate::domain::bar::SourceField;
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{
    DEFAULT_LENGTH, IndicatorKind, IndicatorSpec, MovingAverageKind, OptionsPatch, Smoothing,
};
use crate::domain::render::color::Rgba;
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

pub const INDICATOR_SECTION: &str = "indicator";
pub const RENDER_SECTION: &str = "render";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub title: Option<String>,
    pub color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 800.0,
            height: 400.0,
            pixel_ratio: 1.0,
            title: None,
            color: "#2962ff".to_string(),
        }
    }
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), PlotlineError> {
    let kind = validate_type(config)?;
    validate_length(config, "length")?;
    parse_key::<i64>(config, "offset")?;
    validate_weight(config)?;
    parse_key::<SourceField>(config, "source")?;
    parse_key::<SourceField>(config, "secondary_source")?;
    validate_smoothing(config, kind)?;
    parse_bool_key(config, "allow_mismatched_dates")?;
    Ok(())
}

/// Validates the `[indicator]` section and builds the spec it describes.
/// Keys that do not apply to the chosen type are ignored.
pub fn build_indicator_spec(config: &dyn ConfigPort) -> Result<IndicatorSpec, PlotlineError> {
    validate_indicator_config(config)?;
    let kind = validate_type(config)?;

    let patch = OptionsPatch {
        source: parse_key(config, "source")?,
        secondary_source: parse_key(config, "secondary_source")?,
        length: parse_key(config, "length")?,
        offset: parse_key(config, "offset")?,
        weight: parse_key(config, "weight")?,
        smoothing: smoothing(config)?.map(Some),
        allow_mismatched_dates: parse_bool_key(config, "allow_mismatched_dates")?,
    };

    let mut spec = IndicatorSpec::default_for(kind);
    spec.merge(&patch);
    Ok(spec)
}

pub fn build_render_config(config: &dyn ConfigPort) -> Result<RenderConfig, PlotlineError> {
    let defaults = RenderConfig::default();
    let width = positive(config, "width", defaults.width)?;
    let height = positive(config, "height", defaults.height)?;
    let pixel_ratio = positive(config, "pixel_ratio", defaults.pixel_ratio)?;

    let color = match config.get_string(RENDER_SECTION, "color") {
        Some(c) if !c.trim().is_empty() => normalize_color(c.trim())?,
        _ => defaults.color,
    };
    let title = config
        .get_string(RENDER_SECTION, "title")
        .filter(|t| !t.trim().is_empty());

    Ok(RenderConfig {
        width,
        height,
        pixel_ratio,
        title,
        color,
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> PlotlineError {
    PlotlineError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_type(config: &dyn ConfigPort) -> Result<IndicatorKind, PlotlineError> {
    match config.get_string(INDICATOR_SECTION, "type") {
        Some(s) if !s.trim().is_empty() => IndicatorKind::from_str(&s)
            .map_err(|_| invalid(INDICATOR_SECTION, "type", format!("unknown indicator type '{}'", s.trim()))),
        _ => Err(PlotlineError::ConfigMissing {
            section: INDICATOR_SECTION.to_string(),
            key: "type".to_string(),
        }),
    }
}

/// Parses an optional key; absent or blank is `None`, unparseable is
/// `ConfigInvalid`.
fn parse_key<T: FromStr>(config: &dyn ConfigPort, key: &str) -> Result<Option<T>, PlotlineError> {
    match config.get_string(INDICATOR_SECTION, key) {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(INDICATOR_SECTION, key, format!("cannot parse '{}'", s.trim()))),
        _ => Ok(None),
    }
}

fn parse_bool_key(config: &dyn ConfigPort, key: &str) -> Result<Option<bool>, PlotlineError> {
    match config.get_string(INDICATOR_SECTION, key) {
        Some(s) if !s.trim().is_empty() => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(invalid(INDICATOR_SECTION, key, format!("{key} must be a boolean"))),
        },
        _ => Ok(None),
    }
}

fn validate_length(config: &dyn ConfigPort, key: &str) -> Result<(), PlotlineError> {
    match parse_key::<i64>(config, key)? {
        Some(length) if length < 1 => Err(invalid(
            INDICATOR_SECTION,
            key,
            format!("{key} must be at least 1"),
        )),
        _ => Ok(()),
    }
}

fn validate_weight(config: &dyn ConfigPort) -> Result<(), PlotlineError> {
    match parse_key::<f64>(config, "weight")? {
        Some(weight) if !weight.is_finite() => {
            Err(invalid(INDICATOR_SECTION, "weight", "weight must be finite"))
        }
        _ => Ok(()),
    }
}

fn validate_smoothing(config: &dyn ConfigPort, kind: IndicatorKind) -> Result<(), PlotlineError> {
    validate_length(config, "smoothing_length")?;
    if smoothing(config)?.is_some() && kind != IndicatorKind::MovingAverage {
        return Err(invalid(
            INDICATOR_SECTION,
            "smoothing",
            "smoothing only applies to moving_average",
        ));
    }
    Ok(())
}

fn smoothing(config: &dyn ConfigPort) -> Result<Option<Smoothing>, PlotlineError> {
    let Some(method) = config.get_string(INDICATOR_SECTION, "smoothing") else {
        return Ok(None);
    };
    let method = method.trim();
    if method.is_empty() || method.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let method = MovingAverageKind::from_str(method)
        .map_err(|err| invalid(INDICATOR_SECTION, "smoothing", err.to_string()))?;
    let length = parse_key::<usize>(config, "smoothing_length")?.unwrap_or(DEFAULT_LENGTH);
    Ok(Some(Smoothing { method, length }))
}

fn positive(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, PlotlineError> {
    let Some(raw) = config.get_string(RENDER_SECTION, key) else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(RENDER_SECTION, key, format!("cannot parse '{}'", raw.trim())))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(RENDER_SECTION, key, format!("{key} must be positive")));
    }
    Ok(value)
}

/// INI comments start with `#`, so hex colours may be written without it.
fn normalize_color(raw: &str) -> Result<String, PlotlineError> {
    if Rgba::parse(raw).is_ok() {
        return Ok(raw.to_string());
    }
    let prefixed = format!("#{raw}");
    Rgba::parse(&prefixed)
        .map(|_| prefixed)
        .map_err(|err| invalid(RENDER_SECTION, "color", err.to_string()))
}
