pub mod models;

use std::cmp::Ordering;
use std::collections::HashMap;

use models::{Genre, MovieRecord};

/// Catalogue of every movie the engine knows about, keyed by title.
///
/// Insertion order is preserved so that rating ranks stay stable across
/// rebuilds: two movies with the same rating keep their relative catalogue
/// position. Loading a record for an already-known title replaces the stored
/// record but keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct MovieRegistry {
    names: Vec<String>,
    records: HashMap<String, MovieRecord>,
}

impl MovieRegistry {
    pub fn new() -> MovieRegistry {
        MovieRegistry::default()
    }

    pub fn from_records(records: Vec<MovieRecord>) -> MovieRegistry {
        let mut registry = MovieRegistry::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    pub fn insert(&mut self, record: MovieRecord) {
        if !self.records.contains_key(&record.name) {
            self.names.push(record.name.clone());
        }
        self.records.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&MovieRecord> {
        self.records.get(name)
    }

    /// Genre of a catalogued movie; titles missing from the catalogue are
    /// reported as `Unknown`.
    pub fn genre_of(&self, name: &str) -> Genre {
        self.records
            .get(name)
            .map(|record| record.genre)
            .unwrap_or(Genre::Unknown)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Ranks all catalogued movies by audience rating, best first. Ties keep
    /// catalogue order, ranks are 1-based.
    pub fn rating_ranks(&self) -> RatingRank {
        let mut entries: Vec<(&str, f64)> = self
            .names
            .iter()
            .map(|name| {
                let rating = self
                    .records
                    .get(name)
                    .map(|record| record.audience_rating)
                    .unwrap_or(0.0);
                (name.as_str(), rating)
            })
            .collect();

        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        RatingRank {
            by_name: entries
                .iter()
                .enumerate()
                .map(|(position, (name, _))| ((*name).to_string(), position + 1))
                .collect(),
        }
    }
}

/// Snapshot of the audience-rating ranking, rebuilt whenever the catalogue is
/// loaded.
#[derive(Debug, Clone, Default)]
pub struct RatingRank {
    by_name: HashMap<String, usize>,
}

impl RatingRank {
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
