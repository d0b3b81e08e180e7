/* Lost Person Behavior statistics.

Distances (meters) from the initial planning point within which the given
share of subjects of a category were found. Source: Koester, "Lost Person
Behavior", NASAR guidelines.
*/
use std::collections::{BTreeMap, HashMap};

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

pub const PERCENTILES: [u32; 4] = [25, 50, 75, 95];

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum LpbCategory {
    Child1To3,
    Child4To6,
    Child7To12,
    Hiker,
    Hunter,
    Elderly,
    Dementia,
    Despondent,
    Autistic,
}

impl LpbCategory {
    pub fn key(&self) -> &'static str {
        match self {
            LpbCategory::Child1To3 => "child_1_3",
            LpbCategory::Child4To6 => "child_4_6",
            LpbCategory::Child7To12 => "child_7_12",
            LpbCategory::Hiker => "hiker",
            LpbCategory::Hunter => "hunter",
            LpbCategory::Elderly => "elderly",
            LpbCategory::Dementia => "dementia",
            LpbCategory::Despondent => "despondent",
            LpbCategory::Autistic => "autistic",
        }
    }

    pub fn of_key(key: &str) -> Option<Self> {
        LpbCategory::iter().find(|category| category.key() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LpbCategory::Child1To3 => "Child (1-3 years)",
            LpbCategory::Child4To6 => "Child (4-6 years)",
            LpbCategory::Child7To12 => "Child (7-12 years)",
            LpbCategory::Hiker => "Hiker",
            LpbCategory::Hunter => "Hunter",
            LpbCategory::Elderly => "Elderly",
            LpbCategory::Dementia => "Dementia Patient",
            LpbCategory::Despondent => "Despondent",
            LpbCategory::Autistic => "Autistic",
        }
    }

    // same order as `PERCENTILES`
    pub fn distances(&self) -> [u32; 4] {
        match self {
            LpbCategory::Child1To3 => [100, 300, 700, 1900],
            LpbCategory::Child4To6 => [200, 500, 1100, 2400],
            LpbCategory::Child7To12 => [500, 1300, 2500, 3800],
            LpbCategory::Hiker => [800, 2000, 4000, 8000],
            LpbCategory::Hunter => [1200, 3000, 5500, 10000],
            LpbCategory::Elderly => [200, 500, 1200, 2500],
            LpbCategory::Dementia => [100, 300, 800, 2000],
            LpbCategory::Despondent => [200, 500, 1500, 3000],
            LpbCategory::Autistic => [200, 600, 1200, 2000],
        }
    }

    pub fn distance_at(&self, percentile: u32) -> Option<u32> {
        PERCENTILES
            .iter()
            .position(|p| *p == percentile)
            .map(|i| self.distances()[i])
    }
}

lazy_static! {
    static ref BY_DISPLAY_NAME: HashMap<&'static str, LpbCategory> = LpbCategory::iter()
        .map(|category| (category.display_name(), category))
        .collect();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LpbEntry {
    pub category_key: &'static str,
    pub display_name: &'static str,
    // percentile -> meters
    pub distances: BTreeMap<u32, u32>,
}

/// Distances for the requested percentiles. `None` for an unknown category;
/// percentiles without data are left out of the map.
pub fn get_distances(category_key: &str, percentiles: &[u32]) -> Option<BTreeMap<u32, u32>> {
    let category = LpbCategory::of_key(category_key)?;
    Some(
        percentiles
            .iter()
            .filter_map(|p| category.distance_at(*p).map(|d| (*p, d)))
            .collect(),
    )
}

pub fn get_category_from_display_name(display_name: &str) -> Option<&'static str> {
    BY_DISPLAY_NAME.get(display_name).map(|category| category.key())
}

pub fn list_category_display_names() -> Vec<&'static str> {
    LpbCategory::iter()
        .map(|category| category.display_name())
        .collect()
}

pub fn get_category_info(category_key: &str) -> Option<LpbEntry> {
    let category = LpbCategory::of_key(category_key)?;
    Some(LpbEntry {
        category_key: category.key(),
        display_name: category.display_name(),
        distances: PERCENTILES
            .iter()
            .copied()
            .zip(category.distances())
            .collect(),
    })
}
