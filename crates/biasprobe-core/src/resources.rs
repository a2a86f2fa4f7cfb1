//! Research library: curated references on AI ethics in education.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Framework,
    Policy,
    Research,
    Tool,
    Regulation,
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceCategory::Framework => "Framework",
            ResourceCategory::Policy => "Policy",
            ResourceCategory::Research => "Research",
            ResourceCategory::Tool => "Tool",
            ResourceCategory::Regulation => "Regulation",
        };
        f.write_str(name)
    }
}

/// One library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub category: ResourceCategory,
}

const LIBRARY: [Resource; 5] = [
    Resource {
        title: "UNESCO AI Education Guidelines",
        description: "Global standards for ethical AI implementation in education systems",
        url: "https://unesdoc.unesco.org/ark:/48223/pf0000373432",
        category: ResourceCategory::Framework,
    },
    Resource {
        title: "OECD AI Principles",
        description: "International policy guidelines for trustworthy AI development",
        url: "https://oecd.ai/en/ai-principles",
        category: ResourceCategory::Policy,
    },
    Resource {
        title: "Algorithmic Bias in Education",
        description: "Research paper analyzing bias in learning algorithms (Williamson 2019)",
        url: "https://journals.sagepub.com/doi/full/10.1177/1745499919829680",
        category: ResourceCategory::Research,
    },
    Resource {
        title: "AI Fairness 360 Toolkit",
        description: "Open-source library with 70+ fairness metrics from IBM Research",
        url: "https://aif360.mybluemix.net/",
        category: ResourceCategory::Tool,
    },
    Resource {
        title: "EU AI Act (Education Provisions)",
        description: "Regulatory framework for AI systems in educational contexts",
        url: "https://digital-strategy.ec.europa.eu/en/policies/regulatory-framework-ai",
        category: ResourceCategory::Regulation,
    },
];

/// The research library, in display order.
pub fn library() -> &'static [Resource] {
    &LIBRARY
}
