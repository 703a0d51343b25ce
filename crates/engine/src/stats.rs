//! Aggregated views over the contributions.
//!
//! Nothing here is stored: every view is recomputed from a fresh snapshot
//! of the contributions and the number of guests.

use crate::{ByCategory, Category};

/// Anything that counts as a pledged item.
pub trait Pledge {
    fn category(&self) -> Category;
    fn servings(&self) -> i32;
}

/// Thresholds deciding when alerts are raised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlertThresholds {
    /// Below this many servings per guest a warning is raised.
    pub min_servings_per_guest: f64,
    /// From this many guests on, having no contribution at all is reported.
    pub crowd_size: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            min_servings_per_guest: 2.0,
            crowd_size: 15,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub count: u64,
    pub servings: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContributionTotals {
    pub total_contributions: u64,
    pub total_servings: i64,
    pub by_category: ByCategory<CategoryTotals>,
}

impl ContributionTotals {
    pub fn from_contributions<'a, T, I>(items: I) -> Self
    where
        T: Pledge + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items
            .into_iter()
            .fold(Self::default(), |mut totals, item| {
                let servings = i64::from(item.servings());
                totals.total_contributions += 1;
                totals.total_servings += servings;
                let bucket = &mut totals.by_category[item.category()];
                bucket.count += 1;
                bucket.servings += servings;
                totals
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Warning,
    Info,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    fn warning(message: String) -> Self {
        Self {
            kind: AlertKind::Warning,
            message,
        }
    }

    fn info(message: String) -> Self {
        Self {
            kind: AlertKind::Info,
            message,
        }
    }
}

/// Everything the organizers' dashboard shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    pub guests_count: u64,
    pub contributions_count: u64,
    pub total_servings: i64,
    pub servings_per_guest: f64,
    pub category_coverage: ByCategory<bool>,
    pub by_category: ByCategory<CategoryTotals>,
    pub alerts: Vec<Alert>,
}

impl Statistics {
    pub fn compute<T: Pledge>(
        guests_count: u64,
        contributions: &[T],
        thresholds: &AlertThresholds,
    ) -> Self {
        let totals = ContributionTotals::from_contributions(contributions);
        let category_coverage = coverage(&totals);
        let servings_per_guest = servings_per_guest(totals.total_servings, guests_count);
        let alerts = alerts(
            &category_coverage,
            servings_per_guest,
            guests_count,
            totals.total_contributions,
            thresholds,
        );

        Self {
            guests_count,
            contributions_count: totals.total_contributions,
            total_servings: totals.total_servings,
            servings_per_guest,
            category_coverage,
            by_category: totals.by_category,
            alerts,
        }
    }
}

/// Split contributions into one bucket per category, keeping their order.
pub fn group_by_category<T: Pledge>(items: impl IntoIterator<Item = T>) -> ByCategory<Vec<T>> {
    let mut grouped: ByCategory<Vec<T>> = ByCategory::from_fn(|_| Vec::new());
    for item in items {
        grouped[item.category()].push(item);
    }
    grouped
}

/// `true` for every category with at least one contribution.
pub fn coverage(totals: &ContributionTotals) -> ByCategory<bool> {
    ByCategory::from_fn(|category| totals.by_category[category].count > 0)
}

/// Servings per guest rounded to one decimal, 0 when nobody is registered.
pub fn servings_per_guest(total_servings: i64, guests_count: u64) -> f64 {
    if guests_count == 0 {
        return 0.0;
    }
    let ratio = total_servings as f64 / guests_count as f64;
    (ratio * 10.0).round() / 10.0
}

/// Alerts in display order: missing categories first, then low servings,
/// then the crowd without contributions.
pub fn alerts(
    coverage: &ByCategory<bool>,
    servings_per_guest: f64,
    guests_count: u64,
    contributions_count: u64,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = coverage
        .iter()
        .filter(|(_, covered)| !**covered)
        .map(|(category, _)| {
            Alert::warning(format!("Aucun(e) {} prévu(e)", category.alert_label()))
        })
        .collect();

    if guests_count > 0 && servings_per_guest < thresholds.min_servings_per_guest {
        alerts.push(Alert::warning(format!(
            "Seulement {servings_per_guest} parts par personne - pensez à ajouter des contributions !"
        )));
    }

    if guests_count >= thresholds.crowd_size && contributions_count == 0 {
        alerts.push(Alert::info(
            "Beaucoup de participants mais aucune contribution déclarée".to_string(),
        ));
    }

    alerts
}
