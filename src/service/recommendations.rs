//! Curated travel recommendations
//!
//! Provider-free: a handful of destinations have hand-written activity and
//! tip lists, everything else gets the generic template. Lookup never fails.

use serde::Serialize;

use crate::errors::Error;

use super::OrchestrationResult;
use super::args::RecommendationArgs;

struct Curated {
    names: &'static [&'static str],
    activities: &'static [&'static str],
    tips: &'static [&'static str],
}

const CURATED: &[Curated] = &[
    Curated {
        names: &["paris", "par"],
        activities: &[
            "Visit the Eiffel Tower and enjoy the city views",
            "Explore the Louvre Museum and see the Mona Lisa",
            "Walk along the Champs-Élysées and shop",
            "Take a Seine River cruise to see the city from water",
            "Visit Notre-Dame Cathedral and the Latin Quarter",
            "Explore Montmartre and see the Sacré-Cœur",
        ],
        tips: &[
            "Book museum tickets online to avoid long queues",
            "Use the Paris Metro for efficient transportation",
            "Try authentic French cuisine at local bistros",
            "Visit popular attractions early morning or late evening",
            "Learn basic French phrases for better interactions",
        ],
    },
    Curated {
        names: &["new york", "nyc"],
        activities: &[
            "Visit Times Square and Broadway",
            "Explore Central Park and its attractions",
            "See the Statue of Liberty and Ellis Island",
            "Visit the Metropolitan Museum of Art",
            "Walk across the Brooklyn Bridge",
            "Explore the High Line and Chelsea Market",
        ],
        tips: &[
            "Get a MetroCard for subway and bus transportation",
            "Book Broadway show tickets in advance",
            "Visit museums on free admission days",
            "Use the Staten Island Ferry for free Statue of Liberty views",
            "Explore different neighborhoods for authentic experiences",
        ],
    },
    Curated {
        names: &["london", "lon"],
        activities: &[
            "Visit the Tower of London and see the Crown Jewels",
            "Explore the British Museum",
            "See Big Ben and the Houses of Parliament",
            "Visit Buckingham Palace and watch the Changing of the Guard",
            "Take a ride on the London Eye",
            "Explore the West End and see a show",
        ],
        tips: &[
            "Get an Oyster card for public transportation",
            "Book attractions online for better prices",
            "Visit museums (many are free)",
            "Use the London Underground efficiently",
            "Check the weather and bring appropriate clothing",
        ],
    },
    Curated {
        names: &["tokyo", "tyo"],
        activities: &[
            "Visit Senso-ji Temple in Asakusa",
            "Explore the bustling Shibuya crossing",
            "See the cherry blossoms in Ueno Park",
            "Visit the Tokyo Skytree for city views",
            "Explore the historic Meiji Shrine",
            "Experience the famous Tsukiji Fish Market",
        ],
        tips: &[
            "Get a Japan Rail Pass for long-distance travel",
            "Use the efficient Tokyo Metro system",
            "Try authentic sushi and ramen",
            "Visit temples early to avoid crowds",
            "Learn basic Japanese phrases",
        ],
    },
];

pub const GENERIC_ACTIVITIES: &[&str] = &[
    "Visit local museums and cultural sites",
    "Try authentic local cuisine",
    "Explore historical landmarks",
    "Take a guided city tour",
    "Visit local markets and shops",
    "Experience local festivals and events",
];

pub const GENERIC_TIPS: &[&str] = &[
    "Book attractions in advance to avoid queues",
    "Use public transportation for cost savings",
    "Check local weather forecasts",
    "Learn basic local phrases",
    "Keep emergency contact numbers handy",
    "Research local customs and etiquette",
];

/// Recommendations for one destination
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub destination: String,
    /// False when the generic template was used
    pub curated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub activities: Vec<String>,
    pub tips: Vec<String>,
}

impl Recommendation {
    pub fn into_result(self) -> Result<OrchestrationResult, Error> {
        Ok(OrchestrationResult::object(serde_json::to_value(self)?))
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Look up curated content, case-insensitively, falling back to the generic template
pub fn recommend(args: &RecommendationArgs) -> Recommendation {
    let key = args.destination.trim().to_lowercase();
    let curated = CURATED.iter().find(|c| c.names.contains(&key.as_str()));

    let (activities, tips) = match curated {
        Some(c) => (owned(c.activities), owned(c.tips)),
        None => (owned(GENERIC_ACTIVITIES), owned(GENERIC_TIPS)),
    };

    Recommendation {
        destination: args.destination.clone(),
        curated: curated.is_some(),
        interests: args.interests.clone(),
        budget: args.budget.clone(),
        duration: args.duration.clone(),
        activities,
        tips,
    }
}
