use serde::ser::{Serialize, SerializeMap, Serializer};
use vimius_schema::{GroupName, SubmoduleRecord};

/// Records bucketed by group.
///
/// Groups appear in first-seen manifest order and each bucket keeps the
/// manifest order of its records. Serializes as a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedSubmodules<'a> {
    groups: Vec<(&'a GroupName, Vec<&'a SubmoduleRecord>)>,
}

impl<'a> GroupedSubmodules<'a> {
    pub fn from_records(records: &'a [SubmoduleRecord]) -> Self {
        let mut groups: Vec<(&'a GroupName, Vec<&'a SubmoduleRecord>)> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|(g, _)| **g == record.group) {
                Some((_, bucket)) => bucket.push(record),
                None => groups.push((&record.group, vec![record])),
            }
        }
        Self { groups }
    }

    /// Keep only the bucket for `group`, if there is one.
    pub fn retain_group(&mut self, group: &str) {
        self.groups.retain(|(g, _)| g.as_str() == group);
    }

    pub fn get(&self, group: &str) -> Option<&[&'a SubmoduleRecord]> {
        self.groups
            .iter()
            .find(|(g, _)| g.as_str() == group)
            .map(|(_, bucket)| bucket.as_slice())
    }

    pub fn group_names(&self) -> impl Iterator<Item = &'a GroupName> + '_ {
        self.groups.iter().map(|(g, _)| *g)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a GroupName, &[&'a SubmoduleRecord])> + '_ {
        self.groups.iter().map(|(g, bucket)| (*g, bucket.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for GroupedSubmodules<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, bucket) in &self.groups {
            map.serialize_entry(group, bucket)?;
        }
        map.end()
    }
}
