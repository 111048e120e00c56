use std::collections::HashMap;

use crate::normalize::IssueEntry;

/// Unique issues in first-seen order, each with its incident count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueMap {
    entries: Vec<IssueEntry>,
    by_id: HashMap<String, usize>,
}

impl IssueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more incident for an issue already present, otherwise
    /// inserts it with a single incident. Metadata of the first sighting wins.
    pub fn merge(&mut self, issue: &IssueEntry) {
        match self.by_id.get(&issue.id) {
            Some(&pos) => self.entries[pos].incidents_info.incidents_count += 1,
            None => {
                let mut entry = issue.clone();
                entry.incidents_info.incidents_count = 1;
                self.by_id.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&IssueEntry> {
        self.by_id.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<IssueEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::IncidentsInfo;

    fn issue(id: &str, comment: &str) -> IssueEntry {
        IssueEntry {
            id: id.into(),
            version: Some(1),
            comment: Some(comment.into()),
            report_url: None,
            incidents_info: IncidentsInfo { incidents_count: 1 },
        }
    }

    #[test]
    fn repeated_issue_increments_and_keeps_first_metadata() {
        let mut map = IssueMap::new();
        assert!(map.is_empty());
        map.merge(&issue("i1", "first"));
        map.merge(&issue("i2", "other"));
        map.merge(&issue("i1", "second"));

        let i1 = map.get("i1").unwrap();
        assert_eq!(i1.incidents_info.incidents_count, 2);
        assert_eq!(i1.comment.as_deref(), Some("first"));
        assert_eq!(map.get("i2").unwrap().incidents_info.incidents_count, 1);
        assert_eq!(map.len(), 2);

        let ids: Vec<_> = map.into_vec().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[test]
    fn scopes_count_independently() {
        let mut builds = IssueMap::new();
        let mut tests = IssueMap::new();
        let shared = issue("i1", "c");

        builds.merge(&shared);
        tests.merge(&shared);
        builds.merge(&shared);

        assert_eq!(builds.get("i1").unwrap().incidents_info.incidents_count, 2);
        assert_eq!(tests.get("i1").unwrap().incidents_info.incidents_count, 1);
    }
}
