//! Grid catalog and candidate resolution.
//!
//! Simulations were run on four density-based partitions of the
//! (initial donor mass, initial orbital period) plane and stored per accretor
//! class: one neutron-star group and one group per black-hole reference mass.
//! Axes are held in integer hundredths so every coordinate is exact and
//! formats identically to two decimals.

use crate::domain::{AccretorClass, Interval, Property, ValidatedQuery};

/// A black-hole group is admitted when its reference mass is at most this far
/// below the accretor-mass lower bound.
pub const ACCRETOR_MASS_MARGIN: f64 = 3.5;

/// Inclusive coordinate axis `start..=stop` in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridAxis {
    start: i32,
    stop: i32,
    step: i32,
}

impl GridAxis {
    pub const fn new(start: i32, stop: i32, step: i32) -> Self {
        Self { start, stop, step }
    }

    pub fn len(&self) -> usize {
        if self.step <= 0 || self.stop < self.start {
            return 0;
        }
        ((self.stop - self.start) / self.step) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| (self.start + i as i32 * self.step) as f64 / 100.0)
    }
}

/// One storage partition: a named sub-lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub name: &'static str,
    pub donor_masses: GridAxis,
    pub orbital_periods: GridAxis,
}

/// A black-hole partition group keyed by its reference accretor mass.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackHoleGroup {
    pub reference_mass: f64,
    pub dir: String,
}

impl BlackHoleGroup {
    pub fn new(reference_mass: f64) -> Self {
        Self {
            reference_mass,
            dir: format!("runs{}_data", reference_mass as i64),
        }
    }

    /// Coarse admission filter against the accretor-mass interval.
    pub fn admits(&self, accretor_mass: Option<Interval>) -> bool {
        let Some(iv) = accretor_mass else {
            return true;
        };
        iv.high >= self.reference_mass && iv.low - ACCRETOR_MASS_MARGIN <= self.reference_mass
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCatalog {
    pub partitions: Vec<Partition>,
    pub neutron_star_dir: String,
    pub black_hole_groups: Vec<BlackHoleGroup>,
}

/// Scan-order sort key: group, partition, donor-mass index, period index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateKey {
    pub group: usize,
    pub partition: usize,
    pub donor_mass: usize,
    pub orbital_period: usize,
}

/// A grid coordinate whose record may exist on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: CandidateKey,
    pub group_dir: String,
    pub partition: &'static str,
    pub donor_mass: f64,
    pub orbital_period: f64,
}

/// Resolved candidates for one query, in scan order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Admitted group directories, in scan order.
    pub groups: Vec<String>,
    pub candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl GridCatalog {
    /// The production lattice and storage layout.
    pub fn standard() -> Self {
        let large_mass = GridAxis::new(400, 700, 10);
        let small_mass = GridAxis::new(95, 400, 5);
        let long_period = GridAxis::new(165, 400, 5);
        let short_period = GridAxis::new(-60, 164, 2);

        Self {
            partitions: vec![
                Partition { name: "lmlp", donor_masses: large_mass, orbital_periods: long_period },
                Partition { name: "smlp", donor_masses: small_mass, orbital_periods: long_period },
                Partition { name: "lmsp", donor_masses: large_mass, orbital_periods: short_period },
                Partition { name: "smsp", donor_masses: small_mass, orbital_periods: short_period },
            ],
            neutron_star_dir: "ns_data".to_string(),
            black_hole_groups: vec![BlackHoleGroup::new(7.0), BlackHoleGroup::new(10.0)],
        }
    }

    /// Group directories a query touches, in scan order.
    pub fn admitted_groups(&self, query: &ValidatedQuery) -> Vec<String> {
        match query.accretor_class() {
            AccretorClass::NeutronStar => vec![self.neutron_star_dir.clone()],
            AccretorClass::BlackHole => {
                let accretor_mass = query.interval(Property::AccretorMass);
                self.black_hole_groups
                    .iter()
                    .filter(|g| g.admits(accretor_mass))
                    .map(|g| g.dir.clone())
                    .collect()
            }
        }
    }

    /// Enumerate every candidate coordinate for `query`.
    ///
    /// Donor-mass coordinates below the query's lower bound are skipped:
    /// donor mass only decreases along a track.
    pub fn resolve(&self, query: &ValidatedQuery) -> CandidateSet {
        let groups = self.admitted_groups(query);
        let min_donor_mass = query.interval(Property::DonorMass).map(|iv| iv.low);

        let mut candidates = Vec::new();
        for (gi, group_dir) in groups.iter().enumerate() {
            for (pi, partition) in self.partitions.iter().enumerate() {
                for (mi, m) in partition.donor_masses.values().enumerate() {
                    if min_donor_mass.is_some_and(|low| m < low) {
                        continue;
                    }
                    for (qi, p) in partition.orbital_periods.values().enumerate() {
                        candidates.push(Candidate {
                            key: CandidateKey {
                                group: gi,
                                partition: pi,
                                donor_mass: mi,
                                orbital_period: qi,
                            },
                            group_dir: group_dir.clone(),
                            partition: partition.name,
                            donor_mass: m,
                            orbital_period: p,
                        });
                    }
                }
            }
        }

        CandidateSet { groups, candidates }
    }
}
