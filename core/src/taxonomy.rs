//! Field taxonomy: groups raw field identifiers into display sections.
//!
//! Identifiers carry semantic hints by naming convention: a `project_`
//! prefix, a contact-role prefix (`owner_`, `engineer_`), a positional
//! suffix (`_1` owner block, `_2` engineer block, `_3` pre-bid
//! location), or a date/time marker. Classification runs an ordered rule
//! table top-down; the first satisfied rule wins, which keeps the
//! contract auditable instead of scattering substring checks through the
//! rendering layer. Total and deterministic: every identifier lands in
//! exactly one category.

use std::fmt;

/// Display section for one field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Project,
    Owner,
    Engineer,
    Schedule,
    Location,
    Other,
}

impl FieldCategory {
    /// Fixed rendering order for grouped output.
    pub const ALL: [FieldCategory; 6] = [
        FieldCategory::Project,
        FieldCategory::Owner,
        FieldCategory::Engineer,
        FieldCategory::Schedule,
        FieldCategory::Location,
        FieldCategory::Other,
    ];

    /// Section heading shown above the category's fields.
    pub fn heading(&self) -> &'static str {
        match self {
            FieldCategory::Project => "Project Information",
            FieldCategory::Owner => "Owner Information",
            FieldCategory::Engineer => "Engineer Information",
            FieldCategory::Schedule => "Schedule Information",
            FieldCategory::Location => "Location Information",
            FieldCategory::Other => "Additional Information",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Schedule-looking identifiers reserved for project metadata.
const PROJECT_METADATA_FIELDS: &[&str] = &["completion_days", "starting_hour", "ending_hour"];

/// One classification rule: a predicate and the category it claims.
struct CategoryRule {
    category: FieldCategory,
    matches: fn(&str) -> bool,
}

/// Ordered rule table; first match wins. `Other` is the fallthrough and
/// has no entry. Order matters: the engineer suffix rule claims `date_2`
/// and `time_2` before the schedule rule can see them, while the owner
/// rule explicitly cedes `date_1` and `time_1` to it.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: FieldCategory::Project,
        matches: is_project,
    },
    CategoryRule {
        category: FieldCategory::Owner,
        matches: is_owner,
    },
    CategoryRule {
        category: FieldCategory::Engineer,
        matches: is_engineer,
    },
    CategoryRule {
        category: FieldCategory::Schedule,
        matches: is_schedule,
    },
    CategoryRule {
        category: FieldCategory::Location,
        matches: is_location,
    },
];

fn is_project(field: &str) -> bool {
    field.contains("project_") || PROJECT_METADATA_FIELDS.contains(&field)
}

fn is_owner(field: &str) -> bool {
    field.contains("owner_") || (field.ends_with("_1") && !has_date_or_time_marker(field))
}

fn is_engineer(field: &str) -> bool {
    field.contains("engineer_") || field.ends_with("_2")
}

fn is_schedule(field: &str) -> bool {
    has_date_or_time_marker(field)
}

fn is_location(field: &str) -> bool {
    field.contains("prebid_location") || field.ends_with("_3")
}

fn has_date_or_time_marker(field: &str) -> bool {
    field.contains("date") || field.contains("time")
}

/// True when the identifier names a clock-time value that takes the
/// 12-hour rewrite at submission. Independent of the display category:
/// `time_2` sits in the engineer section but is still a time field.
pub fn is_time_field(field: &str) -> bool {
    field.contains("time")
}

/// Classify one identifier into its display section.
pub fn classify(field: &str) -> FieldCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.matches)(field))
        .map(|rule| rule.category)
        .unwrap_or(FieldCategory::Other)
}

/// Human label for an identifier: underscores become spaces.
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// One non-empty display section with its fields in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub category: FieldCategory,
    pub fields: Vec<String>,
}

/// Group a template's identifiers into display sections, in fixed
/// category order, keeping each section's fields in input order. Empty
/// sections are omitted.
pub fn group_fields(fields: &[&str]) -> Vec<FieldGroup> {
    FieldCategory::ALL
        .iter()
        .filter_map(|&category| {
            let claimed: Vec<String> = fields
                .iter()
                .copied()
                .filter(|field| classify(field) == category)
                .map(str::to_string)
                .collect();
            if claimed.is_empty() {
                None
            } else {
                Some(FieldGroup { category, fields: claimed })
            }
        })
        .collect()
}
