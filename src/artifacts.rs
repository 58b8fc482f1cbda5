//! Run directories and the files written into them
//!
//! A training run gets its own directory `<runs-root>/<YYYYmmdd-HHMMSS>[-tag]`
//! holding `qtable.json`, `config.json`, `metrics.json`, `scores.csv` and
//! `score_plot.svg`. Evaluation adds `eval.json`.

use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ArtifactError;

pub const QTABLE_FILE: &str = "qtable.json";
pub const CONFIG_FILE: &str = "config.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const SCORES_FILE: &str = "scores.csv";
pub const PLOT_FILE: &str = "score_plot.svg";
pub const EVAL_FILE: &str = "eval.json";

/// Default moving-average window of the score plot
pub const PLOT_WINDOW: usize = 100;

/// Local time as `YYYYmmdd-HHMMSS`
pub fn timestamp_id() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Create a fresh run directory under `base`
pub fn make_run_dir(base: &Path, tag: Option<&str>) -> Result<PathBuf, ArtifactError> {
    let mut run_id = timestamp_id();
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        run_id.push('-');
        run_id.push_str(tag);
    }

    let path = base.join(run_id);
    fs::create_dir_all(&path).map_err(|source| ArtifactError::RunDir {
        path: path.clone(),
        source,
    })?;
    info!("created run directory {}", path.display());
    Ok(path)
}

/// Most recently modified subdirectory of `base`
pub fn latest_run_dir(base: &Path) -> Result<PathBuf, ArtifactError> {
    let entries = fs::read_dir(base).map_err(|_| ArtifactError::NoRuns(base.to_path_buf()))?;

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !meta.is_dir() {
                return None;
            }
            Some((meta.modified().ok()?, entry.path()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
        .ok_or_else(|| ArtifactError::NoRuns(base.to_path_buf()))
}

/// Pretty-printed JSON
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, &json)
}

/// Comma-separated rows under a header line
pub fn save_csv<I, R, D>(path: &Path, header: &[&str], rows: I) -> Result<(), ArtifactError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = D>,
    D: Display,
{
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header)?;

    let mut count = 0usize;
    for row in rows {
        wtr.write_record(row.into_iter().map(|cell| cell.to_string()))?;
        count += 1;
    }

    wtr.flush().map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(rows = count, "wrote {}", path.display());
    Ok(())
}

/// `episode,score` with 1-based episodes
pub fn save_scores_csv(path: &Path, scores: &[u32]) -> Result<(), ArtifactError> {
    save_csv(
        path,
        &["episode", "score"],
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| [(i + 1) as u64, score as u64]),
    )
}

/// Trailing mean over at most `window` values
///
/// Early entries average over what is available.
pub fn moving_average<T: Copy + Into<f64>>(xs: &[T], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(xs.len());
    let mut acc = 0.0;

    for (i, &x) in xs.iter().enumerate() {
        acc += x.into();
        if i >= window {
            acc -= xs[i - window].into();
        }
        out.push(acc / (i + 1).min(window) as f64);
    }
    out
}

const PLOT_W: f64 = 750.0;
const PLOT_H: f64 = 400.0;
const MARGIN_L: f64 = 60.0;
const MARGIN_R: f64 = 20.0;
const MARGIN_T: f64 = 40.0;
const MARGIN_B: f64 = 50.0;

/// Line chart of the scores as SVG
///
/// The moving average is drawn only with more than two scores.
pub fn plot_scores(scores: &[u32], path: &Path, window: usize) -> Result<(), ArtifactError> {
    let svg = render_score_svg(scores, window);
    write_file(path, &svg)
}

fn render_score_svg(scores: &[u32], window: usize) -> String {
    let n = scores.len();
    let y_max = scores.iter().copied().max().unwrap_or(0).max(1) as f64;
    let inner_w = PLOT_W - MARGIN_L - MARGIN_R;
    let inner_h = PLOT_H - MARGIN_T - MARGIN_B;

    let x_of = |episode: usize| -> f64 {
        if n <= 1 {
            MARGIN_L + inner_w / 2.0
        } else {
            MARGIN_L + (episode - 1) as f64 / (n - 1) as f64 * inner_w
        }
    };
    let y_of = |v: f64| -> f64 { MARGIN_T + inner_h - v / y_max * inner_h };

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PLOT_W}" height="{PLOT_H}" viewBox="0 0 {PLOT_W} {PLOT_H}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="15">Training scores</text>"#,
        PLOT_W / 2.0
    );

    // Axes
    let x0 = MARGIN_L;
    let y0 = MARGIN_T + inner_h;
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{y0}" x2="{}" y2="{y0}" stroke="black"/>"#,
        PLOT_W - MARGIN_R
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{MARGIN_T}" x2="{x0}" y2="{y0}" stroke="black"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{x0}" y="{}" text-anchor="middle">1</text>"#,
        y0 + 16.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        PLOT_W - MARGIN_R,
        y0 + 16.0,
        n.max(1)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{y0}" text-anchor="end">0</text>"#,
        x0 - 6.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end">{y_max}</text>"#,
        x0 - 6.0,
        MARGIN_T + 4.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">episode</text>"#,
        MARGIN_L + inner_w / 2.0,
        PLOT_H - 12.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="16" y="{}" text-anchor="middle" transform="rotate(-90 16 {})">score</text>"#,
        MARGIN_T + inner_h / 2.0,
        MARGIN_T + inner_h / 2.0
    );

    if n > 0 {
        let points = polyline_points(scores.iter().map(|&s| s as f64), &x_of, &y_of);
        let _ = writeln!(
            svg,
            r##"<polyline fill="none" stroke="#1f77b4" stroke-width="1" points="{points}"/>"##
        );
    }

    let mut legend = vec![("#1f77b4", "score".to_string())];
    if n > 2 {
        let ma = moving_average(scores, window);
        let points = polyline_points(ma.into_iter(), &x_of, &y_of);
        let _ = writeln!(
            svg,
            r##"<polyline fill="none" stroke="#ff7f0e" stroke-width="2" points="{points}"/>"##
        );
        legend.push(("#ff7f0e", format!("moving avg ({})", window.max(1))));
    }

    for (i, (color, label)) in legend.iter().enumerate() {
        let y = MARGIN_T + 10.0 + i as f64 * 16.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="2"/>"#,
            MARGIN_L + 10.0,
            MARGIN_L + 30.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}">{label}</text>"#,
            MARGIN_L + 36.0,
            y + 4.0
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn polyline_points(
    values: impl Iterator<Item = f64>,
    x_of: &impl Fn(usize) -> f64,
    y_of: &impl Fn(f64) -> f64,
) -> String {
    values
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", x_of(i + 1), y_of(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_file(path: &Path, content: &str) -> Result<(), ArtifactError> {
    fs::write(path, content).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = content.len(), "wrote {}", path.display());
    Ok(())
}
