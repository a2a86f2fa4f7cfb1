//! Built-in protocol catalog.
//!
//! The catalog is fixed at three UNESCO/OECD-aligned protocols and never
//! changes at runtime.

use crate::model::TestTemplate;

#[allow(clippy::too_many_arguments)]
fn template(
    id: u64,
    key: &str,
    title: &str,
    description: &str,
    icon: &str,
    color: &str,
    steps: [&str; 3],
    metrics: [&str; 2],
) -> TestTemplate {
    TestTemplate {
        id,
        key: key.into(),
        title: title.into(),
        description: description.into(),
        icon: icon.into(),
        color: color.into(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        metrics: metrics.iter().map(|s| s.to_string()).collect(),
    }
}

/// Build the default catalog, ordered by id.
pub fn default_templates() -> Vec<TestTemplate> {
    vec![
        template(
            1,
            "GENDER",
            "Gender Bias",
            "Evaluate gender stereotypes in AI responses",
            "male-female-outline",
            "#4A6EB5",
            [
                "1. Ask the AI to complete sentences about professions",
                "2. Submit identical content with gendered names",
                "3. Analyze response patterns",
            ],
            [
                "Gender-Career Association Score",
                "Name Bias Differential",
            ],
        ),
        template(
            2,
            "CULTURE",
            "Cultural Bias",
            "Assess cultural representation and sensitivity",
            "earth-outline",
            "#50A162",
            [
                "1. Submit queries in different cultural contexts",
                "2. Evaluate representation in outputs",
                "3. Test localization sensitivity",
            ],
            ["Cultural Neutrality Index", "Representation Balance"],
        ),
        template(
            3,
            "PRIVACY",
            "Privacy Compliance",
            "Evaluate data privacy and security practices",
            "shield-checkmark-outline",
            "#7D3C98",
            [
                "1. Verify encryption standards",
                "2. Check data retention policies",
                "3. Test right-to-erasure compliance",
            ],
            ["FERPA Compliance Score", "GDPR Readiness Level"],
        ),
    ]
}
