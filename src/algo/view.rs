use std::cmp::Ordering;

use super::collate;
use super::handle::Handle;
use super::relations::{sorted, Analysis};

/// A list of handles that can be displayed or exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    NotFollowingBack,
    NotFollowedBack,
    Mutuals,
    Followers,
    Following,
}

impl ViewKind {
    /// Report order: the two sets, then the derived lists.
    pub const ALL: [ViewKind; 5] = [
        Self::Followers,
        Self::Following,
        Self::NotFollowingBack,
        Self::NotFollowedBack,
        Self::Mutuals,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "not-following-back" => Some(Self::NotFollowingBack),
            "not-followed-back" => Some(Self::NotFollowedBack),
            "mutuals" => Some(Self::Mutuals),
            "followers" => Some(Self::Followers),
            "following" => Some(Self::Following),
            _ => None,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &[
            "not-following-back",
            "not-followed-back",
            "mutuals",
            "followers",
            "following",
        ]
    }

    /// Column name in reports, also the default export file stem.
    pub fn key(&self) -> &'static str {
        match self {
            Self::NotFollowingBack => "not_following_back",
            Self::NotFollowedBack => "not_followed_back",
            Self::Mutuals => "mutuals",
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
    /// Shortest first, ties by collation.
    Len,
    /// Longest first, ties by collation.
    LenDesc,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            "len" => Some(Self::Len),
            "len-desc" | "len_desc" => Some(Self::LenDesc),
            _ => None,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["asc", "desc", "len", "len-desc"]
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Asc => collate::compare(a, b),
            Self::Desc => collate::compare(b, a),
            Self::Len => a.len().cmp(&b.len()).then_with(|| collate::compare(a, b)),
            Self::LenDesc => b.len().cmp(&a.len()).then_with(|| collate::compare(a, b)),
        }
    }
}

/// The handles of `kind` from an analysis, in collation order.
pub fn select(analysis: &Analysis, kind: ViewKind) -> Vec<Handle> {
    match kind {
        ViewKind::NotFollowingBack => analysis.views.not_following_back.clone(),
        ViewKind::NotFollowedBack => analysis.views.not_followed_back.clone(),
        ViewKind::Mutuals => analysis.views.mutuals.clone(),
        ViewKind::Followers => sorted(analysis.followers.iter().cloned().collect()),
        ViewKind::Following => sorted(analysis.following.iter().cloned().collect()),
    }
}

/// Sort a copy of `handles` and keep those containing `filter`
/// (trimmed, case-insensitive). An empty filter keeps everything.
pub fn prepare(handles: &[Handle], order: SortOrder, filter: Option<&str>) -> Vec<Handle> {
    let term = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
    let mut out: Vec<Handle> = handles
        .iter()
        .filter(|h| term.is_empty() || h.as_str().contains(term.as_str()))
        .cloned()
        .collect();
    out.sort_by(|a, b| order.compare(a.as_str(), b.as_str()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::normalize::FollowSets;

    fn handles(names: &[&str]) -> Vec<Handle> {
        names.iter().filter_map(|n| Handle::parse(n)).collect()
    }

    fn strs(handles: &[Handle]) -> Vec<&str> {
        handles.iter().map(Handle::as_str).collect()
    }

    #[test]
    fn parses_view_names() {
        for name in ViewKind::all_names() {
            assert!(ViewKind::from_str(name).is_some(), "{name}");
        }
        assert_eq!(
            ViewKind::from_str("Not_Following_Back"),
            Some(ViewKind::NotFollowingBack)
        );
        assert_eq!(ViewKind::from_str("friends"), None);
    }

    #[test]
    fn parses_sort_names() {
        for name in SortOrder::all_names() {
            assert!(SortOrder::from_str(name).is_some(), "{name}");
        }
        assert_eq!(SortOrder::from_str("sideways"), None);
    }

    #[test]
    fn sort_orders() {
        let h = handles(&["bob", "al", "christina", "ann"]);
        assert_eq!(strs(&prepare(&h, SortOrder::Asc, None)), vec!["al", "ann", "bob", "christina"]);
        assert_eq!(strs(&prepare(&h, SortOrder::Desc, None)), vec!["christina", "bob", "ann", "al"]);
        assert_eq!(strs(&prepare(&h, SortOrder::Len, None)), vec!["al", "ann", "bob", "christina"]);
        assert_eq!(strs(&prepare(&h, SortOrder::LenDesc, None)), vec!["christina", "ann", "bob", "al"]);
    }

    #[test]
    fn filter_is_trimmed_and_case_insensitive() {
        let h = handles(&["bob", "bobby", "rob", "alice"]);
        assert_eq!(strs(&prepare(&h, SortOrder::Asc, Some("  OB "))), vec!["bob", "bobby", "rob"]);
        assert_eq!(prepare(&h, SortOrder::Asc, Some("   ")).len(), 4);
        assert!(prepare(&h, SortOrder::Asc, Some("zzz")).is_empty());
    }

    #[test]
    fn select_sets_are_sorted() {
        let analysis = Analysis::new(FollowSets {
            followers: handles(&["zoe", "amy"]).into_iter().collect(),
            following: handles(&["mia"]).into_iter().collect(),
        });
        assert_eq!(strs(&select(&analysis, ViewKind::Followers)), vec!["amy", "zoe"]);
        assert_eq!(strs(&select(&analysis, ViewKind::NotFollowingBack)), vec!["mia"]);
        assert!(select(&analysis, ViewKind::Mutuals).is_empty());
    }
}
