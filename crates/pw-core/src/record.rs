//! Record arena shared by every view
//!
//! Records are loaded once and never mutated. Each one is addressed by the
//! [`RecordIdx`] it received at load time, so membership tests during
//! highlighting are index lookups rather than value comparisons.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric fields of a lap record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    LapNumber,
    LapTime,
    TyreLife,
    S1Delta,
    S2Delta,
    S3Delta,
    Position,
    TrackTemp,
    AirTemp,
    SpeedTrap,
    PcaX,
    PcaY,
    Cluster,
}

impl FieldId {
    pub const COUNT: usize = 13;

    pub const ALL: [FieldId; FieldId::COUNT] = [
        FieldId::LapNumber,
        FieldId::LapTime,
        FieldId::TyreLife,
        FieldId::S1Delta,
        FieldId::S2Delta,
        FieldId::S3Delta,
        FieldId::Position,
        FieldId::TrackTemp,
        FieldId::AirTemp,
        FieldId::SpeedTrap,
        FieldId::PcaX,
        FieldId::PcaY,
        FieldId::Cluster,
    ];

    /// Column name in the source table
    pub fn column_name(self) -> &'static str {
        match self {
            FieldId::LapNumber => "LapNumber",
            FieldId::LapTime => "LapTime_Sec",
            FieldId::TyreLife => "TyreLife",
            FieldId::S1Delta => "S1_Delta",
            FieldId::S2Delta => "S2_Delta",
            FieldId::S3Delta => "S3_Delta",
            FieldId::Position => "Position",
            FieldId::TrackTemp => "TrackTemp",
            FieldId::AirTemp => "AirTemp",
            FieldId::SpeedTrap => "SpeedST",
            FieldId::PcaX => "pca_x",
            FieldId::PcaY => "pca_y",
            FieldId::Cluster => "kmeans_labels",
        }
    }

    /// Human readable axis/readout label
    pub fn label(self) -> &'static str {
        match self {
            FieldId::LapNumber => "Lap",
            FieldId::LapTime => "Lap time (s)",
            FieldId::TyreLife => "Tyre life (laps)",
            FieldId::S1Delta => "Sector 1 delta",
            FieldId::S2Delta => "Sector 2 delta",
            FieldId::S3Delta => "Sector 3 delta",
            FieldId::Position => "Position",
            FieldId::TrackTemp => "Track temp (°C)",
            FieldId::AirTemp => "Air temp (°C)",
            FieldId::SpeedTrap => "Speed trap (km/h)",
            FieldId::PcaX => "PCA 1",
            FieldId::PcaY => "PCA 2",
            FieldId::Cluster => "Cluster",
        }
    }

    /// Whether loading must fail when the column is absent
    pub fn is_required(self) -> bool {
        matches!(self, FieldId::LapNumber | FieldId::LapTime | FieldId::TyreLife)
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.column_name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Categorical fields of a lap record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagId {
    Driver,
    Team,
    Compound,
}

impl TagId {
    pub const COUNT: usize = 3;

    pub const ALL: [TagId; TagId::COUNT] = [TagId::Driver, TagId::Team, TagId::Compound];

    pub fn column_name(self) -> &'static str {
        match self {
            TagId::Driver => "Driver",
            TagId::Team => "Team",
            TagId::Compound => "Compound",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, TagId::Driver | TagId::Compound)
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.column_name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Stable position of a record in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordIdx(pub usize);

impl fmt::Display for RecordIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One lap by one driver
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: RecordIdx,
    values: [f64; FieldId::COUNT],
    tags: [String; TagId::COUNT],
}

impl Record {
    /// A record with every numeric field `NaN` and every tag empty
    pub fn empty() -> Self {
        Self {
            index: RecordIdx(0),
            values: [f64::NAN; FieldId::COUNT],
            tags: Default::default(),
        }
    }

    pub fn with_value(mut self, field: FieldId, value: f64) -> Self {
        self.values[field.slot()] = value;
        self
    }

    pub fn with_tag(mut self, tag: TagId, value: impl Into<String>) -> Self {
        self.tags[tag.slot()] = value.into();
        self
    }

    pub fn set_value(&mut self, field: FieldId, value: f64) {
        self.values[field.slot()] = value;
    }

    pub fn set_tag(&mut self, tag: TagId, value: impl Into<String>) {
        self.tags[tag.slot()] = value.into();
    }

    pub fn index(&self) -> RecordIdx {
        self.index
    }

    /// Numeric value, `NaN` when missing or unparseable
    pub fn value(&self, field: FieldId) -> f64 {
        self.values[field.slot()]
    }

    pub fn tag(&self, tag: TagId) -> &str {
        &self.tags[tag.slot()]
    }
}

/// Ordered set of record indices
///
/// Iteration always follows store order, which is the order used for
/// tie-breaking in the aggregate engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    indices: BTreeSet<RecordIdx>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, idx: RecordIdx) -> bool {
        self.indices.insert(idx)
    }

    pub fn contains(&self, idx: RecordIdx) -> bool {
        self.indices.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordIdx> + '_ {
        self.indices.iter().copied()
    }

    /// Highest index in the set
    pub fn last(&self) -> Option<RecordIdx> {
        self.indices.last().copied()
    }

    pub fn intersection(&self, other: &RecordSet) -> RecordSet {
        self.indices.intersection(&other.indices).copied().collect()
    }
}

impl FromIterator<RecordIdx> for RecordSet {
    fn from_iter<I: IntoIterator<Item = RecordIdx>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordSet {
    type Item = RecordIdx;
    type IntoIter = std::collections::btree_set::IntoIter<RecordIdx>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RecordIdx;
    type IntoIter = std::collections::btree_set::Iter<'a, RecordIdx>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Immutable, fully parsed set of lap records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Build the arena, assigning each record its position as index
    pub fn from_records(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.index = RecordIdx(i);
                record
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: RecordIdx) -> Option<&Record> {
        self.records.get(idx.0)
    }

    pub fn contains(&self, idx: RecordIdx) -> bool {
        idx.0 < self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Every record index
    pub fn all(&self) -> RecordSet {
        (0..self.records.len()).map(RecordIdx).collect()
    }

    /// Whether `set` covers the whole store
    pub fn is_full(&self, set: &RecordSet) -> bool {
        set.len() == self.records.len()
            && set.last().map_or(true, |last| self.contains(last))
    }

    /// Records of `set` in store order, skipping unknown indices
    pub fn resolve<'a>(&'a self, set: &'a RecordSet) -> impl Iterator<Item = &'a Record> + 'a {
        set.iter().filter_map(move |idx| self.get(idx))
    }

    /// Sorted distinct non-empty values of `tag` over `set`
    pub fn distinct_tags(&self, set: &RecordSet, tag: TagId) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .resolve(set)
            .map(|r| r.tag(tag))
            .filter(|v| !v.is_empty())
            .collect();
        distinct.into_iter().map(str::to_string).collect()
    }
}
