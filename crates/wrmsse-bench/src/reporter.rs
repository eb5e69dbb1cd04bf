use wrmsse_scorer::ScoreBreakdown;

/// Print a formatted per-level score table to stdout.
pub fn print_score_report(breakdown: &ScoreBreakdown) {
    println!(
        "{:<20} {:>8} {:>14}",
        "Level", "Series", "Contribution"
    );
    println!("{}", "-".repeat(44));

    for level in &breakdown.levels {
        println!(
            "{:<20} {:>8} {:>14.6}",
            level.name, level.series, level.weighted_rmsse
        );
    }

    println!("{}", "-".repeat(44));
    let series: usize = breakdown.levels.iter().map(|l| l.series).sum();
    println!("{:<20} {:>8} {:>14.6}", "total", series, breakdown.score);
    if breakdown.degenerate_series > 0 {
        println!(
            "  {} series excluded (zero error scale)",
            breakdown.degenerate_series
        );
    }
}
