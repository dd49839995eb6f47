//! Category grouping of the active collection

use serde::Serialize;

use super::timer::Timer;

/// Timers sharing one lowercased category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub timers: Vec<Timer>,
}

/// Groups ordered by the first appearance of their category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedTimers {
    groups: Vec<CategoryGroup>,
}

impl GroupedTimers {
    /// Timers in `category`, matched case-insensitively
    pub fn get(&self, category: &str) -> Option<&[Timer]> {
        let key = category.to_lowercase();
        self.groups
            .iter()
            .find(|group| group.category == key)
            .map(|group| group.timers.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.category.as_str())
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group `timers` by lowercased category, keeping insertion order inside each group
pub fn group_by_category(timers: &[Timer]) -> GroupedTimers {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for timer in timers {
        let key = timer.category.to_lowercase();
        match groups.iter_mut().find(|group| group.category == key) {
            Some(group) => group.timers.push(timer.clone()),
            None => groups.push(CategoryGroup {
                category: key,
                timers: vec![timer.clone()],
            }),
        }
    }

    GroupedTimers { groups }
}
