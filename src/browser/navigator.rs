//! Breadcrumbs for the current path.

use crate::model::LogicalPath;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub index: usize,
    pub is_last: bool,
}

pub fn crumbs(path: &LogicalPath) -> Vec<Crumb> {
    let segments = path.segments();
    let last = segments.len() - 1;
    segments
        .into_iter()
        .enumerate()
        .map(|(index, label)| Crumb {
            label: label.to_string(),
            index,
            is_last: index == last,
        })
        .collect()
}

/// Navigation target for choosing crumb `index`; the last crumb (the current path) and
/// out-of-range indices yield nothing.
pub fn crumb_target(path: &LogicalPath, index: usize) -> Option<LogicalPath> {
    if index + 1 >= path.segments().len() {
        return None;
    }
    path.truncate(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crumbs_mark_the_last_segment() {
        let p = LogicalPath::parse("./docs/notes/a.txt").unwrap();
        let c = crumbs(&p);
        let labels: Vec<&str> = c.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec![".", "docs", "notes", "a.txt"]);
        assert!(c[3].is_last);
        assert!(c[..3].iter().all(|c| !c.is_last));

        let root = crumbs(&LogicalPath::root());
        assert_eq!(root.len(), 1);
        assert!(root[0].is_last);
    }

    #[test]
    fn crumb_target_joins_leading_segments() {
        let p = LogicalPath::parse("./docs/notes/a.txt").unwrap();
        assert_eq!(crumb_target(&p, 1).unwrap().as_str(), "./docs");
        assert!(crumb_target(&p, 0).unwrap().is_root());
        assert_eq!(crumb_target(&p, 3), None);
        assert_eq!(crumb_target(&p, 9), None);
    }
}
