//! Tag tree representation and binary codec for chunk data.

pub mod decode;
pub mod encode;

pub(crate) const TAG_END_ID: u8 = 0;
pub(crate) const TAG_BYTE_ID: u8 = 1;
pub(crate) const TAG_SHORT_ID: u8 = 2;
pub(crate) const TAG_INT_ID: u8 = 3;
pub(crate) const TAG_LONG_ID: u8 = 4;
pub(crate) const TAG_FLOAT_ID: u8 = 5;
pub(crate) const TAG_DOUBLE_ID: u8 = 6;
pub(crate) const TAG_BYTE_ARRAY_ID: u8 = 7;
pub(crate) const TAG_STRING_ID: u8 = 8;
pub(crate) const TAG_LIST_ID: u8 = 9;
pub(crate) const TAG_COMPOUND_ID: u8 = 10;
pub(crate) const TAG_INT_ARRAY_ID: u8 = 11;
pub(crate) const TAG_LONG_ARRAY_ID: u8 = 12;

/// Recursive tag value.
///
/// Lists are homogeneous: all elements share one variant kind. An empty
/// list carries no element type commitment and serializes with the `End`
/// element id. Names exist only on compound entries and the root of a
/// tree; list elements are unnamed.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(CompoundTag),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Type id used in the binary representation.
    pub fn id(&self) -> u8 {
        match self {
            Tag::End => TAG_END_ID,
            Tag::Byte(..) => TAG_BYTE_ID,
            Tag::Short(..) => TAG_SHORT_ID,
            Tag::Int(..) => TAG_INT_ID,
            Tag::Long(..) => TAG_LONG_ID,
            Tag::Float(..) => TAG_FLOAT_ID,
            Tag::Double(..) => TAG_DOUBLE_ID,
            Tag::ByteArray(..) => TAG_BYTE_ARRAY_ID,
            Tag::String(..) => TAG_STRING_ID,
            Tag::List(..) => TAG_LIST_ID,
            Tag::Compound(..) => TAG_COMPOUND_ID,
            Tag::IntArray(..) => TAG_INT_ARRAY_ID,
            Tag::LongArray(..) => TAG_LONG_ARRAY_ID,
        }
    }

    /// Integral value of a `Byte`, `Short`, `Int` or `Long` tag.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(value) => Some(*value as i64),
            Tag::Short(value) => Some(*value as i64),
            Tag::Int(value) => Some(*value as i64),
            Tag::Long(value) => Some(*value),
            _ => None,
        }
    }
}

/// Compound tag with named entries in insertion order.
///
/// Entry names are unique: inserting an existing name replaces the value
/// in place.
#[derive(Debug, Clone, Default)]
pub struct CompoundTag {
    /// Name of the tag; only meaningful for the root tag of a tree.
    pub name: Option<String>,
    entries: Vec<(String, Tag)>,
}

/// The name is root metadata, not tree structure, so it does not take
/// part in equality.
impl PartialEq for CompoundTag {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl CompoundTag {
    pub fn new() -> CompoundTag {
        CompoundTag::default()
    }

    pub fn named(name: impl ToString) -> CompoundTag {
        CompoundTag {
            name: Some(name.to_string()),
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl ToString, tag: Tag) {
        let name = name.to_string();

        match self.entries.iter_mut().find(|(entry_name, _)| *entry_name == name) {
            Some((_, entry_tag)) => *entry_tag = tag,
            None => self.entries.push((name, tag)),
        }
    }

    pub fn insert_bool(&mut self, name: impl ToString, value: bool) {
        self.insert(name, Tag::Byte(value as i8));
    }

    pub fn insert_i32(&mut self, name: impl ToString, value: i32) {
        self.insert(name, Tag::Int(value));
    }

    pub fn insert_i64(&mut self, name: impl ToString, value: i64) {
        self.insert(name, Tag::Long(value));
    }

    pub fn insert_f32(&mut self, name: impl ToString, value: f32) {
        self.insert(name, Tag::Float(value));
    }

    pub fn insert_str(&mut self, name: impl ToString, value: impl ToString) {
        self.insert(name, Tag::String(value.to_string()));
    }

    pub fn insert_i32_vec(&mut self, name: impl ToString, values: Vec<i32>) {
        self.insert(name, Tag::IntArray(values));
    }

    pub fn insert_compound_tag(&mut self, name: impl ToString, compound_tag: CompoundTag) {
        self.insert(name, Tag::Compound(compound_tag));
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name.as_str() == name)
            .map(|(_, tag)| tag)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.entries
            .iter_mut()
            .find(|(entry_name, _)| entry_name.as_str() == name)
            .map(|(_, tag)| tag)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Tag::Byte(value) => Some(*value != 0),
            _ => None,
        }
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Tag::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Tag::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Tag::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_compound_tag(&self, name: &str) -> Option<&CompoundTag> {
        match self.get(name)? {
            Tag::Compound(compound_tag) => Some(compound_tag),
            _ => None,
        }
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> + '_ {
        self.entries.iter().map(|(name, tag)| (name.as_str(), tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks nested compounds along `path` and returns the tag at the
    /// leaf. Returns `None` if any segment is absent or a container on
    /// the way is not a compound.
    pub fn get_path(&self, path: &[&str]) -> Option<&Tag> {
        match path {
            [] => None,
            [leaf] => self.get(leaf),
            [first, rest @ ..] => match self.get(first)? {
                Tag::Compound(compound_tag) => compound_tag.get_path(rest),
                _ => None,
            },
        }
    }

    /// Replaces or inserts the tag at the path's leaf. All intermediate
    /// compounds must already exist; returns whether the tag was placed.
    pub fn set_path(&mut self, path: &[&str], tag: Tag) -> bool {
        match path {
            [] => false,
            [leaf] => {
                self.insert(*leaf, tag);
                true
            }
            [first, rest @ ..] => match self.get_mut(first) {
                Some(Tag::Compound(compound_tag)) => compound_tag.set_path(rest, tag),
                _ => false,
            },
        }
    }

    /// Like [`set_path`](CompoundTag::set_path), but creates missing
    /// intermediate compounds, replacing non-compound tags in the way.
    pub fn set_path_creating(&mut self, path: &[&str], tag: Tag) {
        match path {
            [] => {}
            [leaf] => self.insert(*leaf, tag),
            [first, rest @ ..] => {
                let is_compound = matches!(self.get(first), Some(Tag::Compound(..)));

                if !is_compound {
                    self.insert(*first, Tag::Compound(CompoundTag::new()));
                }

                if let Some(Tag::Compound(compound_tag)) = self.get_mut(first) {
                    compound_tag.set_path_creating(rest, tag);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::nbt::{CompoundTag, Tag};

    fn level_tree(inhabited_time: i64) -> CompoundTag {
        let mut level = CompoundTag::new();
        level.insert_i64("InhabitedTime", inhabited_time);

        let mut root = CompoundTag::new();
        root.insert_compound_tag("Level", level);

        root
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut compound_tag = CompoundTag::new();
        compound_tag.insert_i32("first", 1);
        compound_tag.insert_i32("second", 2);
        compound_tag.insert_i32("first", 3);

        let entries: Vec<_> = compound_tag.iter().collect();

        assert_eq!(entries, vec![("first", &Tag::Int(3)), ("second", &Tag::Int(2))]);
    }

    #[test]
    fn test_get_path() {
        let root = level_tree(42);

        assert_eq!(
            root.get_path(&["Level", "InhabitedTime"]),
            Some(&Tag::Long(42))
        );
        assert_eq!(root.get_path(&["Level", "Missing"]), None);
        assert_eq!(root.get_path(&["Missing", "InhabitedTime"]), None);
        assert_eq!(root.get_path(&[]), None);
    }

    #[test]
    fn test_get_path_through_non_compound() {
        let mut root = CompoundTag::new();
        root.insert_i64("Level", 7);

        assert_eq!(root.get_path(&["Level", "InhabitedTime"]), None);
    }

    #[test]
    fn test_set_path_replaces_leaf() {
        let mut root = level_tree(42);

        assert!(root.set_path(&["Level", "InhabitedTime"], Tag::Long(0)));
        assert_eq!(
            root.get_path(&["Level", "InhabitedTime"]),
            Some(&Tag::Long(0))
        );
    }

    #[test]
    fn test_set_path_requires_intermediate_compounds() {
        let mut root = CompoundTag::new();

        assert!(!root.set_path(&["Level", "InhabitedTime"], Tag::Long(0)));
        assert!(root.is_empty());
    }

    #[test]
    fn test_set_path_creating_builds_intermediates() {
        let mut root = CompoundTag::new();
        root.set_path_creating(&["Level", "InhabitedTime"], Tag::Long(9));

        assert_eq!(
            root.get_path(&["Level", "InhabitedTime"]),
            Some(&Tag::Long(9))
        );
    }

    #[test]
    fn test_typed_getters_check_kind() {
        let mut compound_tag = CompoundTag::new();
        compound_tag.insert_i32("count", 7);

        assert_eq!(compound_tag.get_i32("count"), Some(7));
        assert_eq!(compound_tag.get_i64("count"), None);
        assert_eq!(compound_tag.get_i32("missing"), None);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Tag::Byte(-1).as_i64(), Some(-1));
        assert_eq!(Tag::Short(300).as_i64(), Some(300));
        assert_eq!(Tag::Int(70000).as_i64(), Some(70000));
        assert_eq!(Tag::Long(1 << 40).as_i64(), Some(1 << 40));
        assert_eq!(Tag::String("10".to_string()).as_i64(), None);
    }

    #[test]
    fn test_compound_equality_ignores_name() {
        let unnamed = level_tree(1);
        let mut named = level_tree(1);
        named.name = Some("".to_string());

        assert_eq!(unnamed, named);
    }
}
