//! Built-in document templates and the registry resolving them.
//!
//! Each template names the artifact file the generation service renders
//! and the exact, ordered list of field identifiers the request must
//! carry. The registry is constant data: loaded once, never mutated at
//! runtime. Field identifiers encode display hints by naming convention
//! (`owner_phone`, `street_2`, `date_1`) consumed only by the taxonomy;
//! the registry itself cares about nothing beyond uniqueness and order.

use crate::error::{Error, Result};

/// One document type the service can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateDefinition {
    /// Display name, unique across the registry.
    pub name: &'static str,
    /// Artifact file the service resolves; doubles as the download name.
    pub artifact: &'static str,
    /// Field identifiers in submission order, unique within the template.
    pub fields: &'static [&'static str],
    /// Identifier carrying the joined scope block, for templates with a
    /// repeatable scope section.
    pub scope_field: Option<&'static str>,
}

impl TemplateDefinition {
    pub fn has_scope(&self) -> bool {
        self.scope_field.is_some()
    }
}

/// Every template the client knows how to request.
pub const BUILT_IN_TEMPLATES: &[TemplateDefinition] = &[
    TemplateDefinition {
        name: "Invitation to Bid",
        artifact: "Invitation_To_Bid.docx",
        fields: &[
            "project_name",
            "project_description",
            "owner_name",
            "street_1",
            "city_1",
            "state_1",
            "zip_1",
            "owner_phone",
            "owner_email",
            "date_1",
            "time_1",
            "engineer_name",
            "street_2",
            "city_2",
            "state_2",
            "zip_2",
            "engineer_phone",
            "engineer_email",
            "date_2",
            "time_2",
            "prebid_location",
            "street_3",
            "city_3",
            "state_3",
            "zip_3",
        ],
        scope_field: None,
    },
    TemplateDefinition {
        name: "Instruction to Bidders",
        artifact: "Instruction_To_Bidders.docx",
        fields: &[
            "project_name",
            "project_description",
            "owner_name",
            "street_1",
            "city_1",
            "state_1",
            "zip_1",
            "owner_phone",
            "owner_email",
            "date_1",
            "time_1",
            "engineer_name",
            "address_2",
            "city_2",
            "state_2",
            "zip_2",
            "engineer_phone",
            "engineer_email",
        ],
        scope_field: None,
    },
    TemplateDefinition {
        name: "General Conditions",
        artifact: "General_Conditions.docx",
        fields: &[
            "project_name",
            "completion_days",
            "starting_hour",
            "ending_hour",
        ],
        scope_field: None,
    },
    TemplateDefinition {
        name: "Summary of Work",
        artifact: "Summary_of_Work.docx",
        fields: &[
            "project_name",
            "address_1",
            "city_1",
            "state_1",
            "zip_1",
            "owner_name",
            "address_2",
            "city_2",
            "state_2",
            "zip_2",
            "owner_number",
            "owner_email",
            "date_3",
        ],
        scope_field: Some("project_scope_items"),
    },
];

/// Read-only handle over the template table.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRegistry {
    templates: &'static [TemplateDefinition],
}

impl TemplateRegistry {
    pub fn built_in() -> Self {
        Self {
            templates: BUILT_IN_TEMPLATES,
        }
    }

    /// Resolve a template by display name.
    pub fn lookup(&self, name: &str) -> Result<&'static TemplateDefinition> {
        self.templates
            .iter()
            .find(|template| template.name == name)
            .ok_or_else(|| Error::unknown_template(name))
    }

    /// Template display names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.templates.iter().map(|template| template.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TemplateDefinition> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}
