//! Nearest neighbor ranking of hurricane records.
//!
//! The `k` best candidates are kept in a distance-sorted [`FloatList`] with a
//! parallel [`TextList`] of record names.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rodinia::list::{self, FloatList, TextList};
use serde::{Deserialize, Serialize};

const STORM_NAMES: [&str; 8] = [
    "ALBERTO", "BERYL", "CHRIS", "DEBBY", "ERNESTO", "FLORENCE", "GORDON", "HELENE",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("number of neighbors must be positive")]
    ZeroNeighbors,
    #[error(transparent)]
    List(#[from] list::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Record {
    /// Euclidean distance in degrees.
    #[must_use]
    pub fn distance(&self, lat: f64, lng: f64) -> f64 {
        ((self.lat - lat).powi(2) + (self.lng - lng).powi(2)).sqrt()
    }
}

/// Generates `n` records with latitudes in `[7, 70)` and longitudes in `[0, 358)`.
#[must_use]
pub fn generate_records(n: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| Record {
            name: format!("{}-{i:05}", STORM_NAMES[i % STORM_NAMES.len()]),
            lat: rng.gen_range(7.0..70.0),
            lng: rng.gen_range(0.0..358.0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub name: String,
    pub distance: f64,
}

/// Fixed capacity buffer of the closest records seen so far.
#[derive(Debug)]
pub struct Neighbors {
    k: usize,
    lat: f64,
    lng: f64,
    distances: FloatList,
    names: TextList,
}

impl Neighbors {
    pub fn new(k: usize, lat: f64, lng: f64) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::ZeroNeighbors);
        }
        Ok(Self {
            k,
            lat,
            lng,
            distances: FloatList::new(),
            names: TextList::new(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    fn is_full(&self) -> bool {
        self.distances.len() >= self.k
    }

    /// Considers `record`, keeping it if it is among the `k` closest.
    pub fn offer(&mut self, record: &Record) -> Result<(), Error> {
        let distance = record.distance(self.lat, self.lng);
        if self.is_full() && distance >= self.distances.back()? {
            return Ok(());
        }
        let pos = self
            .distances
            .iter()
            .take_while(|&have| have <= distance)
            .count();

        if self.is_full() && pos == self.k - 1 {
            // replace the current worst in place
            self.names.swap(pos, Some(record.name.as_str()))?;
            self.distances.swap(pos, distance)?;
            return Ok(());
        }

        self.distances.insert(pos, distance);
        self.names.insert(pos, Some(record.name.as_str()));
        if self.distances.len() > self.k {
            let k = self.k;
            self.distances = std::mem::take(&mut self.distances)
                .trim(k)
                .unwrap_or_default();
            self.names = std::mem::take(&mut self.names).trim(k).unwrap_or_default();
        }
        Ok(())
    }

    /// The kept records, closest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<Neighbor> {
        self.names
            .iter()
            .zip(self.distances.iter())
            .map(|(name, distance)| Neighbor {
                name: name.unwrap_or_default().to_string(),
                distance,
            })
            .collect()
    }
}

/// Finds the `k` records closest to `(lat, lng)`.
pub fn nearest(records: &[Record], k: usize, lat: f64, lng: f64) -> Result<Vec<Neighbor>, Error> {
    let mut neighbors = Neighbors::new(k, lat, lng)?;
    for record in records {
        neighbors.offer(record)?;
    }
    log::debug!(
        "kept {} of {} records closest to ({lat}, {lng})",
        neighbors.len(),
        records.len()
    );
    Ok(neighbors.ranked())
}

#[cfg(test)]
mod tests {
    use super::{Error, Neighbors, Record};
    use color_eyre::eyre;

    fn record(name: &str, lat: f64, lng: f64) -> Record {
        Record {
            name: name.to_string(),
            lat,
            lng,
        }
    }

    #[test]
    fn keeps_k_closest_sorted() -> eyre::Result<()> {
        let records = [
            record("far", 10.0, 10.0),
            record("near", 0.0, 1.0),
            record("mid", 3.0, 4.0),
            record("nearest", 0.0, 0.5),
            record("farther", 20.0, 0.0),
        ];
        let ranked = super::nearest(&records, 3, 0.0, 0.0)?;
        let names: Vec<_> = ranked.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["nearest", "near", "mid"]);
        let distances: Vec<_> = ranked.iter().map(|n| n.distance).collect();
        assert_eq!(distances, vec![0.5, 1.0, 5.0]);
        Ok(())
    }

    #[test]
    fn replaces_worst_in_place() -> eyre::Result<()> {
        let records = [
            record("a", 0.0, 1.0),
            record("b", 0.0, 3.0),
            record("c", 0.0, 2.0),
            record("d", 0.0, 9.0),
        ];
        let ranked = super::nearest(&records, 2, 0.0, 0.0)?;
        let names: Vec<_> = ranked.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        Ok(())
    }

    #[test]
    fn offer_keeps_lists_aligned() -> eyre::Result<()> {
        let mut neighbors = Neighbors::new(2, 0.0, 0.0)?;
        for (name, lng) in [("a", 4.0), ("b", 1.0), ("c", 3.0), ("d", 2.0), ("e", 8.0)] {
            neighbors.offer(&record(name, 0.0, lng))?;
            assert_eq!(neighbors.names.len(), neighbors.distances.len());
        }
        assert_eq!(neighbors.len(), 2);
        let ranked: Vec<_> = neighbors
            .ranked()
            .into_iter()
            .map(|n| (n.name, n.distance))
            .collect();
        assert_eq!(
            ranked,
            vec![("b".to_string(), 1.0), ("d".to_string(), 2.0)]
        );
        Ok(())
    }

    #[test]
    fn fewer_records_than_k() -> eyre::Result<()> {
        let ranked = super::nearest(&[record("only", 1.0, 1.0)], 5, 1.0, 1.0)?;
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].distance, 0.0);
        Ok(())
    }

    #[test]
    fn matches_sorting_all_records() -> eyre::Result<()> {
        let records = super::generate_records(500, 7);
        let (lat, lng) = (30.0, 90.0);
        let ranked = super::nearest(&records, 10, lat, lng)?;

        let mut want: Vec<_> = records.iter().map(|r| r.distance(lat, lng)).collect();
        want.sort_by(f64::total_cmp);
        want.truncate(10);
        let have: Vec<_> = ranked.iter().map(|n| n.distance).collect();
        assert_eq!(have, want);
        Ok(())
    }

    #[test]
    fn records_are_seeded() {
        assert_eq!(super::generate_records(20, 1), super::generate_records(20, 1));
        assert_ne!(super::generate_records(20, 1), super::generate_records(20, 2));
        assert!(super::generate_records(100, 3)
            .iter()
            .all(|r| (7.0..70.0).contains(&r.lat) && (0.0..358.0).contains(&r.lng)));
    }

    #[test]
    fn zero_neighbors_is_rejected() {
        assert_eq!(
            super::nearest(&[], 0, 0.0, 0.0),
            Err(Error::ZeroNeighbors)
        );
    }
}
