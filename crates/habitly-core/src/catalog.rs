//! Built-in identity templates and their suggested habits.

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Habit, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogHabit {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl CatalogHabit {
    /// A new habit under `identity_id` with a fresh random id and default
    /// duration and timing.
    pub fn instantiate(&self, identity_id: &str) -> Habit {
        Habit::new(Uuid::new_v4().to_string(), identity_id, self.label).with_icon(self.icon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub habits: &'static [CatalogHabit],
}

impl IdentityTemplate {
    /// An empty identity built from this template, keeping the template id.
    pub fn instantiate(&self) -> Identity {
        Identity::new(self.id, self.label, self.icon)
    }
}

const WATER: CatalogHabit = CatalogHabit {
    id: "water",
    label: "Drink 8 cups of water",
    icon: "🥤",
};
const WORKOUT: CatalogHabit = CatalogHabit {
    id: "workout",
    label: "Workout",
    icon: "🏋️",
};
const WALK: CatalogHabit = CatalogHabit {
    id: "walk",
    label: "Walking",
    icon: "🚶",
};
const EVERYDAY: &[CatalogHabit] = &[WATER, WORKOUT, WALK];

const TEMPLATES: &[IdentityTemplate] = &[
    IdentityTemplate {
        id: "1",
        label: "Fitness Enthusiast",
        icon: "💪",
        habits: &[
            CatalogHabit {
                id: "sleep",
                label: "Sleep over 8h",
                icon: "😴",
            },
            CatalogHabit {
                id: "meal",
                label: "Have a healthy meal",
                icon: "🍽️",
            },
        ],
    },
    IdentityTemplate {
        id: "2",
        label: "Productivity Seeker",
        icon: "🚀",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "health",
        label: "Live healthier",
        icon: "❤️",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "stress",
        label: "Relieve pressure",
        icon: "🧠",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "explore",
        label: "Try new things",
        icon: "🌱",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "focus",
        label: "Be more focused",
        icon: "🎯",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "relationships",
        label: "Better relationship",
        icon: "👥",
        habits: EVERYDAY,
    },
    IdentityTemplate {
        id: "sleep",
        label: "Sleep better",
        icon: "🌙",
        habits: EVERYDAY,
    },
];

pub fn templates() -> &'static [IdentityTemplate] {
    TEMPLATES
}

/// Template by id, or by label ignoring case and surrounding whitespace.
pub fn find_template(key: &str) -> Option<&'static IdentityTemplate> {
    let key = key.trim();
    TEMPLATES
        .iter()
        .find(|t| t.id == key)
        .or_else(|| TEMPLATES.iter().find(|t| t.label.eq_ignore_ascii_case(key)))
}

/// Habits of the template matching the identity's label that the identity
/// does not have yet (compared by label). Unknown labels get no suggestions.
pub fn suggest_habits(identity: &Identity) -> Vec<CatalogHabit> {
    let Some(template) = TEMPLATES
        .iter()
        .find(|t| t.label.eq_ignore_ascii_case(identity.label.trim()))
    else {
        return Vec::new();
    };

    template
        .habits
        .iter()
        .filter(|suggested| {
            !identity
                .habits
                .iter()
                .any(|h| h.label.trim().eq_ignore_ascii_case(suggested.label))
        })
        .copied()
        .collect()
}
