//! Category extractors
//!
//! An [`Extractor`] projects elements of one tag onto the fixed column list of
//! its category. It never fails: a missing attribute becomes an empty field
//! and every value is carried through as the raw text found in the export.

use crate::schema::{Category, CategorySchema};
use crate::xml::SourceElement;

pub use iterators::RecordIterator;

mod iterators;


/// One matched element flattened onto its category's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    /// Category the record belongs to
    pub category: Category,
    /// One value per schema field, in field order
    pub values: Vec<Option<String>>,
}

impl ExtractedRecord {
    /// Column names of this record
    pub fn fields(&self) -> &'static [&'static str] {
        self.category.schema().fields
    }

    /// Value of a named field, `None` if absent or not part of the schema
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields()
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.values.get(i))
            .and_then(|v| v.as_deref())
    }
}

/// Maps elements of one target tag to [`ExtractedRecord`]s
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    schema: &'static CategorySchema,
}

impl Extractor {
    /// Create an extractor driven by a category schema
    pub fn new(schema: &'static CategorySchema) -> Self {
        Self { schema }
    }

    /// Extractor for a category's built-in schema
    pub fn for_category(category: Category) -> Self {
        Self::new(category.schema())
    }

    /// Schema this extractor projects onto
    pub fn schema(&self) -> &'static CategorySchema {
        self.schema
    }

    /// Category produced by this extractor
    pub fn category(&self) -> Category {
        self.schema.category
    }

    /// True if the element carries this extractor's target tag
    pub fn matches(&self, element: &SourceElement) -> bool {
        element.name == self.schema.tag
    }

    /// Project a matching element onto the fixed field list
    pub fn project(&self, element: &SourceElement) -> Option<ExtractedRecord> {
        if !self.matches(element) {
            return None;
        }
        let values = self
            .schema
            .fields
            .iter()
            .map(|field| element.get(field).map(str::to_owned))
            .collect();
        Some(ExtractedRecord {
            category: self.schema.category,
            values,
        })
    }
}

/// Routes each element to every active extractor within one traversal
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    extractors: Vec<Extractor>,
}

impl Dispatcher {
    /// Build a dispatcher over the given categories
    pub fn new(categories: &[Category]) -> Self {
        Self {
            extractors: categories.iter().map(|c| Extractor::for_category(*c)).collect(),
        }
    }

    /// Extractors in dispatch order
    pub fn extractors(&self) -> &[Extractor] {
        &self.extractors
    }

    /// All records produced by one element, with the index of the extractor
    /// that produced each
    pub fn dispatch<'a>(
        &'a self,
        element: &'a SourceElement,
    ) -> impl Iterator<Item = (usize, ExtractedRecord)> + 'a {
        self.extractors
            .iter()
            .enumerate()
            .filter_map(move |(i, extractor)| extractor.project(element).map(|r| (i, r)))
    }
}
