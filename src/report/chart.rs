use std::path::Path;

use svg::Document;
use svg::node::element::{Line, Rectangle, Text};

use crate::analysis::RankedResult;
use crate::error::{AnalysisError, Result};

const SVG_WIDTH: f64 = 820.0;
const LABEL_WIDTH: f64 = 130.0;
const PLOT_LEFT: f64 = LABEL_WIDTH + 20.0;
const PLOT_RIGHT: f64 = SVG_WIDTH - 40.0;
const PLOT_TOP: f64 = 70.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 8.0;
const AXIS_SPACE: f64 = 60.0;

/// -log10(FDR), with an FDR of zero floored at the smallest positive f64.
pub fn neg_log10(fdr: f64) -> f64 {
    -fdr.max(f64::MIN_POSITIVE).log10()
}

/// Bars of the `top_n` most significant TFs, most significant first.
pub fn chart_bars(result: &RankedResult, top_n: usize) -> Vec<(String, f64)> {
    result
        .top(top_n)
        .iter()
        .filter_map(|r| r.fdr.map(|q| (r.tf.to_string(), neg_log10(q))))
        .collect()
}

/// Horizontal bar chart of -log10(FDR) for the top `top_n` TFs, with the
/// most significant TF at the top.
pub fn render_bar_chart(result: &RankedResult, top_n: usize, threshold: f64) -> String {
    let bars = chart_bars(result, top_n);
    let plot_bottom = PLOT_TOP + bars.len().max(1) as f64 * (BAR_HEIGHT + BAR_GAP);
    let height = plot_bottom + AXIS_SPACE;
    let max_value = bars
        .iter()
        .map(|(_, v)| *v)
        .fold(neg_log10(threshold), f64::max)
        .max(1.0);
    let scale = (PLOT_RIGHT - PLOT_LEFT) / max_value;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, SVG_WIDTH, height))
        .set("width", SVG_WIDTH)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", SVG_WIDTH)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(format!(
                "Top {} TF regulons enriched for {} genes",
                bars.len(),
                result.gene_set
            ))
            .set("x", PLOT_LEFT)
            .set("y", 30.0)
            .set("font-family", "sans-serif")
            .set("font-size", 16)
            .set("fill", "#0f172a"),
        )
        .add(
            Text::new(format!(
                "{} of {} regulon targets in gene set | {}",
                result.universe_size, result.population_size, result.correction
            ))
            .set("x", PLOT_LEFT)
            .set("y", 50.0)
            .set("font-family", "sans-serif")
            .set("font-size", 11)
            .set("fill", "#475569"),
        );

    for (i, (tf, value)) in bars.iter().enumerate() {
        let y = PLOT_TOP + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let fill = if *value > neg_log10(threshold) {
            "#2563eb"
        } else {
            "#94a3b8"
        };
        doc = doc
            .add(
                Rectangle::new()
                    .set("x", PLOT_LEFT)
                    .set("y", y)
                    .set("width", value * scale)
                    .set("height", BAR_HEIGHT)
                    .set("fill", fill),
            )
            .add(
                Text::new(tf.clone())
                    .set("x", PLOT_LEFT - 8.0)
                    .set("y", y + BAR_HEIGHT * 0.7)
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 12)
                    .set("fill", "#111827"),
            )
            .add(
                Text::new(format!("{value:.2}"))
                    .set("x", PLOT_LEFT + value * scale + 4.0)
                    .set("y", y + BAR_HEIGHT * 0.7)
                    .set("font-family", "monospace")
                    .set("font-size", 10)
                    .set("fill", "#374151"),
            );
    }

    let cutoff_x = PLOT_LEFT + neg_log10(threshold) * scale;
    doc = doc
        .add(
            Line::new()
                .set("x1", PLOT_LEFT)
                .set("y1", plot_bottom)
                .set("x2", PLOT_RIGHT)
                .set("y2", plot_bottom)
                .set("stroke", "#334155")
                .set("stroke-width", 1),
        )
        .add(
            Line::new()
                .set("x1", cutoff_x)
                .set("y1", PLOT_TOP - 6.0)
                .set("x2", cutoff_x)
                .set("y2", plot_bottom)
                .set("stroke", "#dc2626")
                .set("stroke-dasharray", "4 3")
                .set("stroke-width", 1),
        )
        .add(
            Text::new("-log10(FDR)")
                .set("x", (PLOT_LEFT + PLOT_RIGHT) / 2.0)
                .set("y", plot_bottom + 36.0)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 12)
                .set("fill", "#0f172a"),
        );

    let step = (max_value / 10.0).ceil().max(1.0) as usize;
    for tick in (0..=max_value.ceil() as usize).step_by(step) {
        let x = PLOT_LEFT + tick as f64 * scale;
        if x > PLOT_RIGHT + 0.5 {
            break;
        }
        doc = doc.add(
            Text::new(tick.to_string())
                .set("x", x)
                .set("y", plot_bottom + 16.0)
                .set("text-anchor", "middle")
                .set("font-family", "monospace")
                .set("font-size", 10)
                .set("fill", "#475569"),
        );
    }

    doc.to_string()
}

pub fn write_bar_chart(path: &Path, result: &RankedResult, top_n: usize, threshold: f64) -> Result<()> {
    std::fs::write(path, render_bar_chart(result, top_n, threshold))
        .map_err(|e| AnalysisError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TfEnrichment;
    use crate::genes::GeneSymbol;
    use crate::testing::correction::CorrectionMethod;
    use approx::assert_relative_eq;

    fn ranked(fdrs: &[Option<f64>]) -> RankedResult {
        RankedResult {
            gene_set: "ageing".to_string(),
            universe_size: 10,
            population_size: 100,
            correction: CorrectionMethod::BenjaminiHochberg,
            rows: fdrs
                .iter()
                .enumerate()
                .map(|(i, &fdr)| TfEnrichment {
                    tf: GeneSymbol::new(&format!("TF{i}")).unwrap(),
                    regulon_size: 5,
                    hits: 1,
                    expected: Some(0.5),
                    fold_enrichment: Some(2.0),
                    p_value: fdr,
                    score: fdr.map(neg_log10),
                    fdr,
                })
                .collect(),
        }
    }

    #[test]
    fn test_bars_keep_rank_order_and_limit() {
        let result = ranked(&[Some(1e-4), Some(0.01), Some(0.2), Some(0.9)]);
        let bars = chart_bars(&result, 3);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].0, "TF0");
        assert_relative_eq!(bars[0].1, 4.0, epsilon = 1e-9);
        assert!(bars.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_untested_rows_are_not_drawn() {
        let result = ranked(&[Some(0.01), None]);
        assert_eq!(chart_bars(&result, 15).len(), 1);
    }

    #[test]
    fn test_zero_fdr_is_finite() {
        assert!(neg_log10(0.0).is_finite());
        assert!(neg_log10(0.0) > 300.0);
    }

    #[test]
    fn test_render_contains_labels() {
        let result = ranked(&[Some(1e-3), Some(0.5)]);
        let svg = render_bar_chart(&result, 15, 0.05);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("TF0"));
        assert!(svg.contains("TF1"));
        assert!(svg.contains("-log10(FDR)"));
        assert!(svg.contains("ageing"));
    }
}
