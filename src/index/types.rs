//! Typed records for the archive index

use std::fmt;

/// The fixed set of file-entry categories a section can declare.
///
/// Every section table may carry up to ten `{TAG}_ADDR` / `{TAG}_NAME`
/// array pairs, one per category. The set is closed: category iteration is
/// an explicit enumeration, not introspection over the section record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Long-distance course meshes.
    Long,
    /// Near-field course meshes.
    Near,
    /// Level-of-detail meshes.
    Lodm,
    /// Road surface.
    Road,
    /// On-road network geometry.
    Onrd,
    /// Background scenery.
    Back,
    /// Cast (placed) scenery objects.
    Cast,
    /// Reference collision meshes.
    Refc,
    /// Reference region meshes.
    Refr,
    /// Reference background groups.
    Rfbg,
}

impl Category {
    /// All categories, in the order the descriptor declares them.
    pub const ALL: [Category; 10] = [
        Category::Long,
        Category::Near,
        Category::Lodm,
        Category::Road,
        Category::Onrd,
        Category::Back,
        Category::Cast,
        Category::Refc,
        Category::Refr,
        Category::Rfbg,
    ];

    /// The descriptor tag for this category (e.g. `LONG`).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Category::Long => "LONG",
            Category::Near => "NEAR",
            Category::Lodm => "LODM",
            Category::Road => "ROAD",
            Category::Onrd => "ONRD",
            Category::Back => "BACK",
            Category::Cast => "CAST",
            Category::Refc => "REFC",
            Category::Refr => "REFR",
            Category::Rfbg => "RFBG",
        }
    }

    /// The `{TAG}_ADDR` key for this category.
    #[must_use]
    pub fn addr_key(self) -> String {
        format!("{}_ADDR", self.tag())
    }

    /// The `{TAG}_NAME` key for this category.
    #[must_use]
    pub fn name_key(self) -> String {
        format!("{}_NAME", self.tag())
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One named sub-file's location inside a section's BIN container.
///
/// Offsets are carried signed so a negative value declared in the
/// descriptor surfaces as a range error at read time instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The sub-file name, also used for the extracted output file.
    pub name: String,
    /// Start offset inside the (decompressed) container.
    pub start: i64,
    /// Length of the sub-file in bytes.
    pub length: i64,
}

/// A logical group of file entries backed by one BIN container.
#[derive(Debug, Clone)]
pub struct Section {
    /// Numeric section identifier from the descriptor.
    pub id: u32,
    /// Container path as configured in the descriptor.
    pub bin_path: String,
    entries: [Vec<FileEntry>; 10],
}

impl Section {
    pub(crate) fn new(id: u32, bin_path: String, entries: [Vec<FileEntry>; 10]) -> Self {
        Self {
            id,
            bin_path,
            entries,
        }
    }

    /// The entries of one category, in descriptor declaration order.
    #[must_use]
    pub fn entries(&self, category: Category) -> &[FileEntry] {
        &self.entries[category.slot()]
    }

    /// Iterate categories and their entries in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[FileEntry])> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.entries(category)))
    }

    /// Total number of file entries across all categories.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }
}

/// The full archive index: every section of the descriptor, in order.
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    /// Sections in descriptor declaration order.
    pub sections: Vec<Section>,
}

impl ArchiveIndex {
    /// Total number of file entries across all sections.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.sections.iter().map(Section::entry_count).sum()
    }
}
