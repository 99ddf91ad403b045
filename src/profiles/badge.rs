use serde::{Serialize, Serializer};

/// Display tier derived from accumulated points. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Badge {
    RisingStar,
    CivicHero,
    Guardian,
    Champion,
}

impl Badge {
    /// Inclusive lower bounds, checked from the highest tier down.
    pub fn for_points(points: i64) -> Self {
        match points {
            p if p >= 2500 => Badge::Champion,
            p if p >= 1000 => Badge::Guardian,
            p if p >= 500 => Badge::CivicHero,
            _ => Badge::RisingStar,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Badge::RisingStar => "Rising Star",
            Badge::CivicHero => "Civic Hero",
            Badge::Guardian => "Guardian",
            Badge::Champion => "Champion",
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(Badge::for_points(2500), Badge::Champion);
        assert_eq!(Badge::for_points(2499), Badge::Guardian);
        assert_eq!(Badge::for_points(1000), Badge::Guardian);
        assert_eq!(Badge::for_points(999), Badge::CivicHero);
        assert_eq!(Badge::for_points(500), Badge::CivicHero);
        assert_eq!(Badge::for_points(499), Badge::RisingStar);
        assert_eq!(Badge::for_points(0), Badge::RisingStar);
    }

    #[test]
    fn monotonic_in_points() {
        let mut prev = Badge::for_points(-10);
        for p in -10..3000 {
            let b = Badge::for_points(p);
            assert!(b >= prev, "badge dropped at {p}");
            prev = b;
        }
    }

    #[test]
    fn serializes_as_label() {
        for b in [Badge::RisingStar, Badge::CivicHero, Badge::Guardian, Badge::Champion] {
            assert_eq!(serde_json::to_value(b).unwrap(), b.label());
        }
    }
}
