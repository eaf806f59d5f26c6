
use crate::constants;
use crate::table::TableRow;

/// Birth date fields extracted from a document. All-`None` is a valid outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BirthDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl BirthDate {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

/// One row of the birth table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthRecord {
    /// Join key of the base-list name this record was produced for
    pub lookup_name: String,
    /// Slug of the document used, or the last slug attempted when unresolved
    pub resolved_slug: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl BirthRecord {
    pub fn new(lookup_name: String, resolved_slug: Option<String>, date: BirthDate) -> Self {
        Self {
            lookup_name,
            resolved_slug,
            year: date.year,
            month: date.month,
            day: date.day,
        }
    }
}

impl TableRow for BirthRecord {
    fn header() -> Vec<&'static str> {
        constants::birth_columns()
    }

    fn to_row(&self) -> Vec<Option<String>> {
        vec![
            Some(self.lookup_name.clone()),
            self.resolved_slug.clone(),
            self.year.map(|v| v.to_string()),
            self.month.map(|v| v.to_string()),
            self.day.map(|v| v.to_string()),
        ]
    }
}

/// One row of the raw education table, before splitting into pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationRecord {
    pub lookup_name: String,
    pub resolved_slug: Option<String>,
    /// Raw text of the infobox education row
    pub education: Option<String>,
}

impl TableRow for EducationRecord {
    fn header() -> Vec<&'static str> {
        constants::education_columns()
    }

    fn to_row(&self) -> Vec<Option<String>> {
        vec![
            Some(self.lookup_name.clone()),
            self.resolved_slug.clone(),
            self.education.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationPair {
    pub institution: Option<String>,
    pub degree: Option<String>,
}

impl EducationPair {
    pub fn new(institution: Option<String>, degree: Option<String>) -> Self {
        Self {
            institution,
            degree,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.institution.is_none() && self.degree.is_none()
    }
}

/// Number of education pairs carried per entity.
pub const EDUCATION_SLOTS: usize = 3;

/// Exactly three ordered education pairs; unused slots are empty pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationPairs(pub [EducationPair; EDUCATION_SLOTS]);

impl EducationPairs {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fills slots in order from `pairs`, ignoring anything past the last slot.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = EducationPair>,
    {
        let mut slots = Self::empty();
        for (slot, pair) in slots.0.iter_mut().zip(pairs) {
            *slot = pair;
        }
        slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &EducationPair> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(EducationPair::is_empty)
    }

    /// Cells in `university_1, degree_1, ..., degree_3` order.
    pub fn to_cells(&self) -> Vec<Option<String>> {
        self.0
            .iter()
            .flat_map(|p| [p.institution.clone(), p.degree.clone()])
            .collect()
    }
}
