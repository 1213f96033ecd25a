//! Rank calculation within a (category, age group) population

/// Metric an athlete is ranked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    BestLift,
    TotalLift,
}

/// Anything that can be placed in a category/age-group ranking
pub trait Rankable {
    fn category(&self) -> Option<&str>;
    fn active_age_group(&self) -> &str;
    fn metric(&self, metric: Metric) -> f64;
}

fn is_ranked_value(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Rank `entries` on `metric` inside one (category, age group) population.
///
/// Returns one rank per entry, in input order. Members with a positive
/// value get 1-based ranks, highest value first; everyone else gets 0.
/// Equal values keep their input order and receive distinct consecutive
/// ranks (no shared places).
pub fn calculate_ranks<T: Rankable>(
    entries: &[T],
    metric: Metric,
    category: Option<&str>,
    age_group: &str,
) -> Vec<u32> {
    let mut members: Vec<(usize, f64)> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.category() == category && e.active_age_group() == age_group)
        .map(|(i, e)| (i, e.metric(metric)))
        .filter(|(_, v)| is_ranked_value(*v))
        .collect();

    // sort_by is stable, ties stay in input order
    members.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = vec![0; entries.len()];
    for (position, (index, _)) in members.into_iter().enumerate() {
        ranks[index] = position as u32 + 1;
    }
    ranks
}

/// Rank every entry against the others sharing its category and age group.
///
/// Returns `(best_lift_rank, total_lift_rank)` per entry, in input order.
pub fn rank_population<T: Rankable>(entries: &[T]) -> Vec<(u32, u32)> {
    let mut result = vec![(0, 0); entries.len()];
    let mut seen: Vec<(Option<&str>, &str)> = Vec::new();

    for entry in entries {
        let key = (entry.category(), entry.active_age_group());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        let best = calculate_ranks(entries, Metric::BestLift, key.0, key.1);
        let total = calculate_ranks(entries, Metric::TotalLift, key.0, key.1);
        for (i, slot) in result.iter_mut().enumerate() {
            if best[i] > 0 {
                slot.0 = best[i];
            }
            if total[i] > 0 {
                slot.1 = total[i];
            }
        }
    }
    result
}
