//! The visual element set: one bar per array position, each carrying a
//! displayed value and a small set of visual tags.

use serde::Serialize;

/// Visual tag on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Comparing,
    Swapping,
    Sorted,
    Active,
}

impl Tag {
    const ALL: [Tag; 4] = [Tag::Comparing, Tag::Swapping, Tag::Sorted, Tag::Active];

    fn bit(self) -> u8 {
        match self {
            Tag::Comparing => 1 << 0,
            Tag::Swapping => 1 << 1,
            Tag::Sorted => 1 << 2,
            Tag::Active => 1 << 3,
        }
    }
}

/// Set of tags active on one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u8);

impl TagSet {
    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    pub fn remove(&mut self, tag: Tag) {
        self.0 &= !tag.bit();
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

/// What the playback engine needs from a rendering layer.
///
/// All calls are synchronous and side-effect only. Indices are assumed to be
/// in range; an out-of-range index is a bug in the step producer.
pub trait VisualElements {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, index: usize) -> i64;

    fn set_value(&mut self, index: usize, value: i64);

    fn add_tag(&mut self, index: usize, tag: Tag);

    fn remove_tag(&mut self, index: usize, tag: Tag);

    fn has_tag(&self, index: usize, tag: Tag) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub value: i64,
    pub tags: TagSet,
}

/// In-memory visual element set rendered by the TUI and used headless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarSet {
    bars: Vec<Bar>,
}

impl BarSet {
    pub fn from_values(values: &[i64]) -> Self {
        Self {
            bars: values
                .iter()
                .map(|&value| Bar {
                    value,
                    tags: TagSet::default(),
                })
                .collect(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn values(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.value).collect()
    }

    pub fn tags(&self, index: usize) -> TagSet {
        self.bars[index].tags
    }

    /// Largest displayed value, used to scale bar heights.
    pub fn max_value(&self) -> i64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }

    /// Indices currently carrying `tag`.
    pub fn tagged(&self, tag: Tag) -> Vec<usize> {
        self.bars
            .iter()
            .enumerate()
            .filter(|(_, b)| b.tags.contains(tag))
            .map(|(i, _)| i)
            .collect()
    }
}

impl VisualElements for BarSet {
    fn len(&self) -> usize {
        self.bars.len()
    }

    fn value(&self, index: usize) -> i64 {
        self.bars[index].value
    }

    fn set_value(&mut self, index: usize, value: i64) {
        self.bars[index].value = value;
    }

    fn add_tag(&mut self, index: usize, tag: Tag) {
        self.bars[index].tags.insert(tag);
    }

    fn remove_tag(&mut self, index: usize, tag: Tag) {
        self.bars[index].tags.remove(tag);
    }

    fn has_tag(&self, index: usize, tag: Tag) -> bool {
        self.bars[index].tags.contains(tag)
    }
}
