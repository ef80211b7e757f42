// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::runner::{DecalReplay, ShapeRow};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Print the shape survey as a table
    pub fn report_shapes(complexity: f32, rows: &[ShapeRow]) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Complexity:".bold(), format!("{:.2}", complexity).cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {:<12} {:>12} {:>10} {:>10} {:>11} {:>10}",
            "shape".bold(),
            "resolution".bold(),
            "expected".bold(),
            "built".bold(),
            "watertight".bold(),
            "time".bold()
        );

        for row in rows {
            let expected = row
                .expected_triangles
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            let built = if row.expected_triangles == Some(row.triangles) {
                row.triangles.to_string().green()
            } else {
                row.triangles.to_string().red()
            };
            let watertight = if row.watertight { "yes".green() } else { "no".yellow() };
            println!(
                "  {:<12} {:>12} {:>10} {:>10} {:>11} {:>10}",
                row.shape.name().cyan(),
                row.resolution.to_string(),
                expected,
                built,
                watertight,
                Self::format_duration(row.duration).bright_black()
            );
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Print the outcome of a decal replay
    pub fn report_decals(target: &str, replay: &DecalReplay) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Target:".bold(), target.cyan());
        println!("{}", "━".repeat(80).bright_black());

        let placed = format!("{} / {}", replay.placed, replay.clicks);
        let placed = if replay.placed == replay.clicks {
            placed.green()
        } else {
            placed.yellow()
        };
        println!("  {} {}", "Placed:".bright_black(), placed);
        println!(
            "  {} {}",
            "Triangles:".bright_black(),
            replay.triangles.to_string().cyan()
        );
        if !replay.bounds.is_empty() {
            let (min, max) = (replay.bounds.min, replay.bounds.max);
            println!(
                "  {} [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
                "Bounds:".bright_black(),
                min.x,
                min.y,
                min.z,
                max.x,
                max.y,
                max.z
            );
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(replay.duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
