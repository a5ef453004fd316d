use std::collections::HashSet;

use crate::model::Outcome;

/// The two directional differences plus the edge rule that applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub outcome: Outcome,
    pub not_following_back: Vec<String>,
    pub you_dont_follow_back: Vec<String>,
}

/// Compare following `f` against combined followers `w`.
///
/// Edge rules, first match wins: empty `f`, empty `w`, both differences
/// empty, only `notFollowingBack` empty, only `youDontFollowBack` empty.
/// The empty-input rules return empty differences.
pub fn reconcile(f: &[String], w: &[String]) -> Reconciled {
    if f.is_empty() {
        return Reconciled::empty(Outcome::EmptyFollowing);
    }
    if w.is_empty() {
        return Reconciled::empty(Outcome::EmptyFollowers);
    }

    let following: HashSet<&str> = f.iter().map(String::as_str).collect();
    let followers: HashSet<&str> = w.iter().map(String::as_str).collect();

    let not_following_back: Vec<String> = f
        .iter()
        .filter(|name| !followers.contains(name.as_str()))
        .cloned()
        .collect();
    let you_dont_follow_back: Vec<String> = w
        .iter()
        .filter(|name| !following.contains(name.as_str()))
        .cloned()
        .collect();

    let outcome = match (not_following_back.is_empty(), you_dont_follow_back.is_empty()) {
        (true, true) => Outcome::Mutual,
        (true, false) => Outcome::CircleComplete,
        (false, true) => Outcome::SomeDontFollowBack,
        (false, false) => Outcome::Mixed,
    };

    Reconciled {
        outcome,
        not_following_back,
        you_dont_follow_back,
    }
}

impl Reconciled {
    fn empty(outcome: Outcome) -> Self {
        Self {
            outcome,
            not_following_back: Vec::new(),
            you_dont_follow_back: Vec::new(),
        }
    }
}
