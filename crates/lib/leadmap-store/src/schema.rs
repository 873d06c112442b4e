pub const TABLE_LEAD: &str = "lead";
pub const TABLE_ENRICHMENT: &str = "enrichment";

pub const STATUS_NEW: &str = "new";
pub const STATUS_QUALIFIED: &str = "qualified";
pub const STATUS_CONTACTED: &str = "contacted";
pub const STATUS_DISQUALIFIED: &str = "disqualified";

/// Derives a stable lead id from a company name or domain.
///
/// Lowercases the input and collapses every run of non-alphanumeric
/// characters into a single dash, trimming dashes at both ends.
#[must_use]
pub fn make_lead_id(source: &str) -> String {
    let mut id = String::with_capacity(source.len());
    let mut pending_dash = false;
    for ch in source.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    id
}
