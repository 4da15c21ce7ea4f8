//! ASCII dashboard renderer: a per-snippet summary line plus one histogram
//! for an (arbitrary, deterministically-chosen) snippet.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute, queue};

use crate::snippet::{Id, CONTROL_ID};
use crate::stats::Stat;
use crate::tdigest::TDigest;

const HISTOGRAM_POINTS: usize = 200;
const HISTOGRAM_ROWS: f64 = 40.0;

/// Render one dashboard frame to `out`. Takes `BTreeMap`s (not `HashMap`s) so
/// the per-snippet lines print in a stable, sorted-by-id order rather than
/// hash-iteration order — the only place "arbitrary" should show up is the
/// histogram's snippet choice, not the whole table's row order.
pub fn render(
    out: &mut impl Write,
    stats: &BTreeMap<Id, Stat>,
    digests: &BTreeMap<Id, TDigest>,
) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    queue!(out, SetForegroundColor(Color::Cyan))?;
    writeln!(out, "insn-bench live dashboard")?;
    queue!(out, ResetColor)?;
    writeln!(out, "{:<8} {:>12} {:>24} {:>8}", "id", "mean(cyc)", "95% ci", "n")?;

    for (&id, stat) in stats {
        let label = if id == CONTROL_ID {
            "control".to_string()
        } else {
            id.to_string()
        };
        let color = if id == CONTROL_ID {
            Color::Yellow
        } else {
            Color::Green
        };
        queue!(out, SetForegroundColor(color))?;
        writeln!(
            out,
            "{:<8} {:>12.2} {:>24} {:>8}",
            label,
            stat.mean(),
            stat.confidence_interval_string(),
            stat.count()
        )?;
        queue!(out, ResetColor)?;
    }

    if let Some((&id, digest)) = digests.iter().find(|(&id, _)| id != CONTROL_ID) {
        writeln!(out, "\nhistogram for snippet {id}")?;
        render_histogram(out, digest)?;
    }

    out.flush()
}

/// Sample the digest's CDF at `HISTOGRAM_POINTS` points across its observed
/// range, take `log10(ratio + 1e-9)` (compressing the long tail so sparse
/// high-quantile bins are still visible), rescale to `HISTOGRAM_ROWS`, and
/// print one line of `*` glyphs per point.
fn render_histogram(out: &mut impl Write, digest: &TDigest) -> io::Result<()> {
    let Some((min, max)) = digest.bounds() else {
        return Ok(());
    };
    if (max - min).abs() < f64::EPSILON {
        writeln!(out, "(single value, no spread to histogram)")?;
        return Ok(());
    }

    let mut log_ratios = Vec::with_capacity(HISTOGRAM_POINTS);
    for i in 0..HISTOGRAM_POINTS {
        let v = min + (max - min) * i as f64 / (HISTOGRAM_POINTS - 1) as f64;
        let ratio = digest.get_ratio(v);
        log_ratios.push((ratio + 1e-9).log10());
    }

    let lo = log_ratios.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = log_ratios.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(f64::EPSILON);

    for log_ratio in log_ratios {
        let height = (((log_ratio - lo) / span) * HISTOGRAM_ROWS).round().max(0.0) as usize;
        writeln!(out, "{}", "*".repeat(height))?;
    }
    Ok(())
}
