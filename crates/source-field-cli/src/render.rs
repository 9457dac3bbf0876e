use rand::Rng;
use source_field_core::{Environment, Observation};

const CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
const POSITIVE_MARK: char = 'P';
const NEGATIVE_MARK: char = 'n';
const SOURCE_MARK: char = 'X';

/// Rasterise the field into `rows` x `cols` characters, highest y first.
///
/// With `show_observations`, committed labels and the source origin are drawn
/// over the heatmap.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn render_ascii<R: Rng>(
    env: &Environment<R>,
    rows: usize,
    cols: usize,
    show_observations: bool,
) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let bounds = env.grid().bounds();
    let scale_x = bounds.width() / cols as f64;
    let scale_y = bounds.height() / rows as f64;

    let mut canvas: Vec<Vec<char>> = (0..rows)
        .map(|r| {
            // Row 0 is the top of the plot.
            let y = bounds.end_y - (r as f64 + 0.5) * scale_y;
            (0..cols)
                .map(|c| {
                    let x = bounds.start_x + (c as f64 + 0.5) * scale_x;
                    let val = env.intensity_at(x, y).unwrap_or(0.0);
                    let idx = (val * (CHARS.len() - 1) as f64).round() as usize;
                    CHARS[idx.min(CHARS.len() - 1)]
                })
                .collect()
        })
        .collect();

    if show_observations {
        let to_cell = |p: [f64; 2]| -> Option<(usize, usize)> {
            if !bounds.contains(p[0], p[1]) {
                return None;
            }
            let c = ((p[0] - bounds.start_x) / scale_x) as usize;
            let r = ((bounds.end_y - p[1]) / scale_y) as usize;
            Some((r.min(rows - 1), c.min(cols - 1)))
        };
        for (label, mark) in [
            (Observation::Negative, NEGATIVE_MARK),
            (Observation::Positive, POSITIVE_MARK),
        ] {
            for point in env.observed_points(label) {
                if let Some((r, c)) = to_cell(point) {
                    canvas[r][c] = mark;
                }
            }
        }
        if let Some((r, c)) = to_cell(env.source_origin()) {
            canvas[r][c] = SOURCE_MARK;
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

pub fn legend(show_observations: bool) -> String {
    let ramp: String = CHARS.iter().collect();
    if show_observations {
        format!(
            "intensity 0 [{ramp}] 1   {SOURCE_MARK} source  {POSITIVE_MARK} positive  {NEGATIVE_MARK} negative"
        )
    } else {
        format!("intensity 0 [{ramp}] 1")
    }
}
