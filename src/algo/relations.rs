use serde::Serialize;

use super::collate;
use super::handle::Handle;
use super::normalize::{FollowSet, FollowSets};

/// The three derived lists, each sorted with [`collate::compare`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipViews {
    /// Following − followers: accounts that do not follow back.
    pub not_following_back: Vec<Handle>,
    /// Followers − following: accounts not followed back.
    pub not_followed_back: Vec<Handle>,
    /// Followers ∩ following.
    pub mutuals: Vec<Handle>,
}

impl RelationshipViews {
    pub fn derive(followers: &FollowSet, following: &FollowSet) -> Self {
        Self {
            not_following_back: difference(following, followers),
            not_followed_back: difference(followers, following),
            mutuals: intersection(followers, following),
        }
    }
}

/// Result of one successful analysis run. Never mutated; a new upload
/// produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub followers: FollowSet,
    pub following: FollowSet,
    #[serde(flatten)]
    pub views: RelationshipViews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub followers: usize,
    pub following: usize,
    pub not_following_back: usize,
    pub not_followed_back: usize,
    pub mutuals: usize,
}

impl Analysis {
    pub fn new(sets: FollowSets) -> Self {
        let views = RelationshipViews::derive(&sets.followers, &sets.following);
        Self {
            followers: sets.followers,
            following: sets.following,
            views,
        }
    }

    pub fn counts(&self) -> Counts {
        Counts {
            followers: self.followers.len(),
            following: self.following.len(),
            not_following_back: self.views.not_following_back.len(),
            not_followed_back: self.views.not_followed_back.len(),
            mutuals: self.views.mutuals.len(),
        }
    }
}

/// `a − b`, collation-sorted.
pub fn difference(a: &FollowSet, b: &FollowSet) -> Vec<Handle> {
    sorted(a.difference(b).cloned().collect())
}

/// `a ∩ b`, collation-sorted.
pub fn intersection(a: &FollowSet, b: &FollowSet) -> Vec<Handle> {
    sorted(a.intersection(b).cloned().collect())
}

/// A fresh collation sort of any set of handles.
pub fn sorted(mut handles: Vec<Handle>) -> Vec<Handle> {
    collate::sort(&mut handles);
    handles
}
