//! Output formatting module

use serde::Serialize;

use liftmeet_domain::model::{Athlete, Attempt, AttemptSet, AttemptSlot, Competition};
use liftmeet_domain::service::Standing;
use liftmeet_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn format_kg(value: f64) -> String {
    if value > 0.0 {
        format!("{}", value)
    } else {
        "-".to_string()
    }
}

fn format_rank(rank: u32) -> String {
    if rank > 0 {
        rank.to_string()
    } else {
        "-".to_string()
    }
}

pub fn output_competitions(
    output_format: OutputFormat,
    competitions: &[Competition],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(competitions);
    }

    if competitions.is_empty() {
        println!("No competitions registered.");
        return Ok(());
    }

    println!(
        "{:>4} {:<30} {:<10} {:<20} {:<12}",
        "ID", "Name", "Date", "Location", "Type"
    );
    println!("{}", "-".repeat(80));
    for c in competitions {
        println!(
            "{:>4} {:<30} {:<10} {:<20} {:<12}",
            c.id,
            truncate(&c.name, 30),
            c.date.format("%Y-%m-%d"),
            truncate(&c.location, 20),
            truncate(&c.kind, 12)
        );
    }
    Ok(())
}

pub fn output_athletes(output_format: OutputFormat, athletes: &[Athlete]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(athletes);
    }

    if athletes.is_empty() {
        println!("No athletes found.");
        return Ok(());
    }

    println!(
        "{:>4} {:<24} {:<6} {:<7} {:<8} {:<20} {:>7} {:<8} {:>6} {:>4}",
        "ID", "Name", "Gender", "Class", "Age", "Team", "BW", "Session", "Opener", "Lot"
    );
    println!("{}", "-".repeat(104));
    for a in athletes {
        println!(
            "{:>4} {:<24} {:<6} {:<7} {:<8} {:<20} {:>7} {:<8} {:>6} {:>4}",
            a.id,
            truncate(&a.name, 24),
            a.gender.map(|g| g.label()).unwrap_or("-"),
            or_dash(a.category()),
            or_dash(a.age_group()),
            truncate(&a.team, 20),
            a.body_weight()
                .map(|w| format!("{:.1}", w))
                .unwrap_or_else(|| "-".to_string()),
            or_dash(a.session.as_deref()),
            or_dash(a.attempt1.as_deref()),
            a.lot_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!();
    println!("Total: {} athletes", athletes.len());
    Ok(())
}

#[derive(Serialize)]
struct AttemptsView<'a> {
    athlete: &'a Athlete,
    attempts: &'a AttemptSet,
    best_lift: f64,
    total_lift: f64,
}

pub fn output_attempts(
    output_format: OutputFormat,
    athlete: &Athlete,
    attempts: &AttemptSet,
    by_weight: bool,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&AttemptsView {
            athlete,
            attempts,
            best_lift: attempts.best_lift(),
            total_lift: attempts.total_lift(),
        });
    }

    println!("\n{} ({})", athlete.name, athlete.team);
    println!("{}", "=".repeat(40));

    let rows: Vec<(AttemptSlot, &Attempt)> = if by_weight {
        attempts.ordered_by_weight()
    } else {
        AttemptSlot::ALL
            .into_iter()
            .map(|slot| (slot, attempts.get(slot)))
            .collect()
    };
    for (slot, attempt) in rows {
        println!(
            "{:<10} {:>7} {:>4}",
            slot.key(),
            attempt.display(),
            attempt.status.tag()
        );
    }
    println!("{}", "-".repeat(40));
    println!("Best lift:  {}", format_kg(attempts.best_lift()));
    println!("Total lift: {}", format_kg(attempts.total_lift()));
    Ok(())
}

pub fn output_standings(
    output_format: OutputFormat,
    competition: &Competition,
    standings: &[Standing<'_>],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(standings);
    }

    println!(
        "\n{} - {} - {} ({})",
        competition.name,
        competition.location,
        competition.date.format("%Y-%m-%d"),
        competition.kind
    );
    println!("{}", "=".repeat(118));

    if standings.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!(
        "{:<18} {:<7} {:<22} {:<16} {:>6} {:>6} {:>6} {:>6} {:>7} {:>5} {:>7} {:>5}",
        "Session", "Class", "Name", "Team", "1", "2", "3", "PL", "Best", "#", "Total", "#"
    );
    println!("{}", "-".repeat(118));
    for s in standings {
        println!(
            "{:<18} {:<7} {:<22} {:<16} {:>6} {:>6} {:>6} {:>6} {:>7} {:>5} {:>7} {:>5}",
            truncate(&s.display_session(), 18),
            or_dash(s.athlete.category()),
            truncate(&s.athlete.name, 22),
            truncate(&s.athlete.team, 16),
            s.attempts.attempt1.display(),
            s.attempts.attempt2.display(),
            s.attempts.attempt3.display(),
            s.attempts.pl.display(),
            format_kg(s.best_lift),
            format_rank(s.best_lift_rank),
            format_kg(s.total_lift),
            format_rank(s.total_lift_rank),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Oluwaseun Adeyemi-Bakare", 12), "Oluwaseun...");
        assert_eq!(truncate("Zoë Müller-Lüdenscheidt", 8), "Zoë M...");
    }

    #[test]
    fn test_zero_values_show_dash() {
        assert_eq!(format_kg(0.0), "-");
        assert_eq!(format_kg(142.5), "142.5");
        assert_eq!(format_rank(0), "-");
        assert_eq!(format_rank(3), "3");
    }
}
