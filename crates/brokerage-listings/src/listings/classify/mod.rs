//! Rule-based assignment of one presentation category per listing.

mod rules;

use super::domain::{CanonicalListing, ListingCategory};
use rules::{ClassificationSignals, RULES};
use serde::Serialize;
use tracing::debug;

/// Category used when no rule matches.
// TODO: confirm with the brokerage whether unmatched listings should stay
// estates or get a separate "other" layout.
pub const DEFAULT_CATEGORY: ListingCategory = ListingCategory::Estate;

/// Category plus the rule that produced it (`None` for the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: ListingCategory,
    pub rule: Option<&'static str>,
}

pub fn classify(listing: &CanonicalListing) -> ListingCategory {
    explain(listing).category
}

pub fn explain(listing: &CanonicalListing) -> Classification {
    let signals = ClassificationSignals::from_listing(listing);
    let classification = RULES
        .iter()
        .find(|rule| (rule.matches)(&signals))
        .map(|rule| Classification {
            category: rule.category,
            rule: Some(rule.name),
        })
        .unwrap_or(Classification {
            category: DEFAULT_CATEGORY,
            rule: None,
        });

    debug!(
        id = %listing.id,
        category = classification.category.key(),
        rule = classification.rule.unwrap_or("default"),
        "classified listing"
    );
    classification
}
