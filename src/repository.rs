//! The repository of available package variants.

use indexmap::IndexMap;

use crate::{constraint::ConstraintExpr, internal::id::PackageId, version::Version};

/// A single package variant as it appears in the repository input document.
///
/// `depends` is a conjunction of disjunctions: every group must have at
/// least one satisfied alternative whenever the package is installed.
/// `conflicts` lists expressions none of which may match an installed
/// package at the same time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageRecord {
    /// The package name. Several records may share a name, one per version.
    pub name: String,
    /// The version string, ordered by the loose version ordering.
    pub version: String,
    /// The cost of installing this variant.
    pub size: u64,
    /// Dependency groups (AND of ORs of constraint expressions).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub depends: Vec<Vec<String>>,
    /// Conflict constraint expressions.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub conflicts: Vec<String>,
}

/// An index over all available package variants, keyed by package name.
///
/// The repository is built once from the input records and is read-only for
/// the remainder of a run.
pub struct Repository {
    records: Vec<PackageRecord>,
    versions: Vec<Version>,
    by_name: IndexMap<String, Vec<PackageId>>,
}

impl Repository {
    /// Builds the index from the input records, preserving their order.
    pub fn from_records(records: impl IntoIterator<Item = PackageRecord>) -> Self {
        let records: Vec<_> = records.into_iter().collect();
        let versions = records
            .iter()
            .map(|record| Version::parse(&record.version))
            .collect();
        let mut by_name: IndexMap<String, Vec<PackageId>> = IndexMap::new();
        for (index, record) in records.iter().enumerate() {
            by_name
                .entry(record.name.clone())
                .or_default()
                .push(PackageId::from_usize(index));
        }
        Self {
            records,
            versions,
            by_name,
        }
    }

    /// The number of package variants in the repository.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository holds no variants at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record for the given id.
    ///
    /// Panics if the id does not belong to this repository.
    pub fn record(&self, id: PackageId) -> &PackageRecord {
        &self.records[id.to_usize()]
    }

    pub(crate) fn version(&self, id: PackageId) -> &Version {
        &self.versions[id.to_usize()]
    }

    /// All variants registered under the given package name.
    pub fn variants(&self, name: &str) -> &[PackageId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Enumerates every variant satisfying the given constraint expression.
    ///
    /// An unknown package name yields nothing; whether that is an error is
    /// the caller's decision.
    pub fn matching<'r>(
        &'r self,
        expr: &'r ConstraintExpr,
    ) -> impl Iterator<Item = PackageId> + 'r {
        self.variants(&expr.name)
            .iter()
            .copied()
            .filter(move |&id| expr.matches(self.version(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            name: name.to_owned(),
            version: version.to_owned(),
            size: 1,
            depends: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    #[test]
    fn indexes_variants_by_name() {
        let repo = Repository::from_records([
            record("a", "1.0"),
            record("b", "2.0"),
            record("a", "2.0"),
        ]);
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.variants("a").len(), 2);
        assert_eq!(repo.variants("b").len(), 1);
        assert!(repo.variants("missing").is_empty());
    }

    #[test]
    fn matching_filters_by_version_bound() {
        let repo = Repository::from_records([
            record("a", "1.0"),
            record("a", "1.9"),
            record("a", "1.10"),
        ]);
        let expr = ConstraintExpr::parse("a>=1.9").unwrap();
        let matches: Vec<_> = repo.matching(&expr).collect();
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|&id| repo.record(id).version != "1.0"));
    }
}
