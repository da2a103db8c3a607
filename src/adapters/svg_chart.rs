//! Static SVG chart of a base series and one indicator.
//!
//! Overlay indicators share the price pane with the base series; the rest
//! get their own pane below it.

use crate::adapters::linear_space::LinearCoordinateSpace;
use crate::adapters::svg_canvas::SvgCanvas;
use crate::domain::bar::{Bar, DerivedPoint, SourceField};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{IndicatorKind, IndicatorSpec};
use crate::domain::indicator_config::RenderConfig;
use crate::domain::render::PaneRenderer;
use crate::domain::render::anchored_text::{AnchoredTextOptions, AnchoredTextRenderer};
use crate::domain::render::background_shade::{BackgroundShadeOptions, BackgroundShadeRenderer};
use crate::domain::render::hlc_area::{HlcAreaOptions, HlcAreaRenderer, HlcPoint};
use crate::domain::render::line::{LineOptions, LineRenderer};
use crate::domain::render::lollipop::{LollipopOptions, LollipopRenderer};
use crate::domain::render::price_line::{PriceLineOptions, PriceLineRenderer};
use crate::domain::render::price_scale_labels::{
    PriceLabel, PriceScaleLabelsOptions, PriceScaleLabelsRenderer,
};
use crate::ports::canvas_port::{BitmapScope, RenderTarget};
use tracing::debug;

const MARGIN: f64 = 12.0;
const PRICE_PANE_SHARE: f64 = 0.65;
const LAST_PRICE_COLOR: &str = "#787b86";

fn band(bars: &[Bar]) -> Vec<HlcPoint> {
    let source = SourceField::detect(bars);
    bars.iter()
        .filter_map(|bar| match bar.hlc() {
            Some((high, low, close)) => Some(HlcPoint::new(bar.time, high, low, close)),
            None => {
                let value = source?.read(bar)?;
                Some(HlcPoint::new(bar.time, value, value, value))
            }
        })
        .collect()
}

fn defined(points: &[DerivedPoint]) -> impl Iterator<Item = f64> + '_ {
    points.iter().filter_map(|p| p.value)
}

fn draw_all(
    canvas: &mut SvgCanvas,
    scope: BitmapScope,
    space: &LinearCoordinateSpace,
    renderers: &[&dyn PaneRenderer],
) -> Result<(), PlotlineError> {
    let mut target = RenderTarget {
        context: canvas,
        scope,
        space,
    };
    for renderer in renderers {
        renderer.draw(&mut target)?;
    }
    Ok(())
}

fn label(text: String) -> AnchoredTextRenderer {
    let mut renderer = AnchoredTextRenderer::new();
    renderer.update(&text, AnchoredTextOptions::default());
    renderer
}

/// Renders the chart to an SVG document.
pub fn render_chart(
    config: &RenderConfig,
    spec: &IndicatorSpec,
    bars: &[Bar],
    derived: &[DerivedPoint],
) -> Result<String, PlotlineError> {
    let band = band(bars);
    let Some(last) = band.last().and_then(|p| p.close) else {
        return Err(PlotlineError::Data {
            reason: "nothing to render: base series has no numeric bars".to_string(),
        });
    };

    let overlay = spec.kind().is_overlay();
    let ratio = config.pixel_ratio;
    let price_height = if overlay {
        config.height
    } else {
        (config.height * PRICE_PANE_SHARE).round()
    };
    let times: Vec<f64> = bars.iter().map(|b| b.time).collect();

    let mut prices: Vec<f64> = band
        .iter()
        .flat_map(|p| [p.high, p.low])
        .flatten()
        .collect();
    if overlay {
        prices.extend(defined(derived));
    }
    let price_space = LinearCoordinateSpace::fit(&times, prices, config.width, price_height, MARGIN)
        .ok_or_else(|| PlotlineError::Render {
            reason: "price pane has no finite coordinates".to_string(),
        })?;

    let mut base = HlcAreaRenderer::new();
    base.update(band, HlcAreaOptions::default());
    let mut indicator_line = LineRenderer::new();
    indicator_line.update(
        derived.to_vec(),
        LineOptions {
            color: config.color.clone(),
            ..Default::default()
        },
    );
    let mut last_line = PriceLineRenderer::new();
    last_line.update(
        last,
        PriceLineOptions {
            color: LAST_PRICE_COLOR.to_string(),
            ..Default::default()
        },
    );
    let mut last_label = PriceScaleLabelsRenderer::new();
    last_label.update(
        vec![PriceLabel::for_price(last, 2, LAST_PRICE_COLOR)],
        PriceScaleLabelsOptions::default(),
    );
    let title = match &config.title {
        Some(title) if overlay => label(format!("{title}\n{spec}")),
        Some(title) => label(title.clone()),
        None => label(spec.to_string()),
    };

    let mut price_canvas = SvgCanvas::new(
        (config.width * ratio).round(),
        (price_height * ratio).round(),
    );
    let price_scope = BitmapScope::new(config.width, price_height, ratio);
    let mut price_layers: Vec<&dyn PaneRenderer> = Vec::new();
    price_layers.push(&base);
    price_layers.push(&last_line);
    if overlay {
        price_layers.push(&indicator_line);
    }
    price_layers.push(&last_label);
    price_layers.push(&title);
    draw_all(&mut price_canvas, price_scope, &price_space, &price_layers)?;

    let mut root = SvgCanvas::new(
        (config.width * ratio).round(),
        (config.height * ratio).round(),
    );
    root.embed(&price_canvas, 0.0, 0.0);

    if !overlay {
        let pane_height = config.height - price_height;
        let mut pane = SvgCanvas::new(
            (config.width * ratio).round(),
            (pane_height * ratio).round(),
        );
        let mut values: Vec<f64> = defined(derived).collect();
        if spec.kind() != IndicatorKind::Ratio {
            values.push(0.0);
        }
        if let Some(space) = LinearCoordinateSpace::fit(&times, values, config.width, pane_height, MARGIN) {
            let layers = oscillator_layers(spec.kind(), config, derived)?;
            let name = label(spec.to_string());
            let mut refs: Vec<&dyn PaneRenderer> = layers.iter().map(|l| &**l).collect();
            refs.push(&name);
            draw_all(
                &mut pane,
                BitmapScope::new(config.width, pane_height, ratio),
                &space,
                &refs,
            )?;
        }
        root.embed(&pane, 0.0, (price_height * ratio).round());
    }

    debug!(indicator = %spec, bars = bars.len(), overlay, "rendered chart");
    Ok(root.finish())
}

fn oscillator_layers(
    kind: IndicatorKind,
    config: &RenderConfig,
    derived: &[DerivedPoint],
) -> Result<Vec<Box<dyn PaneRenderer>>, PlotlineError> {
    let mut layers: Vec<Box<dyn PaneRenderer>> = Vec::new();
    match kind {
        IndicatorKind::Momentum | IndicatorKind::PercentChange => {
            let mut zero = PriceLineRenderer::new();
            zero.update(
                0.0,
                PriceLineOptions {
                    color: LAST_PRICE_COLOR.to_string(),
                    ..Default::default()
                },
            );
            let mut stems = LollipopRenderer::new();
            stems.update(
                derived.to_vec(),
                LollipopOptions {
                    color: config.color.clone(),
                    ..Default::default()
                },
            );
            layers.push(Box::new(zero));
            layers.push(Box::new(stems));
        }
        IndicatorKind::Correlation => {
            let mut shade = BackgroundShadeRenderer::new();
            shade.update(
                derived.to_vec(),
                &BackgroundShadeOptions {
                    low_value: -1.0,
                    high_value: 1.0,
                    ..Default::default()
                },
            )?;
            let mut line = LineRenderer::new();
            line.update(
                derived.to_vec(),
                LineOptions {
                    color: config.color.clone(),
                    ..Default::default()
                },
            );
            layers.push(Box::new(shade));
            layers.push(Box::new(line));
        }
        _ => {
            let mut line = LineRenderer::new();
            line.update(
                derived.to_vec(),
                LineOptions {
                    color: config.color.clone(),
                    ..Default::default()
                },
            );
            layers.push(Box::new(line));
        }
    }
    Ok(layers)
}
