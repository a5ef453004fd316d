use std::fmt;

use crate::model::{Outcome, ReconStats, ReconciliationResult};
use crate::reconcile::Reconciled;

/// Non-fatal findings attached to a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconWarning {
    DuplicatesRemoved,
    PossiblyIncompleteFollowers,
    ExtraFollowingFiles { used: String, ignored: Vec<String> },
}

impl fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatesRemoved => {
                write!(f, "We cleaned up a few duplicates before comparing.")
            }
            Self::PossiblyIncompleteFollowers => write!(
                f,
                "You may have multiple followers files. Try uploading followers_2.json, \
                 followers_3.json, etc. for full results."
            ),
            Self::ExtraFollowingFiles { used, ignored } => write!(
                f,
                "Found more than one following.json; using {used} and ignoring {}.",
                ignored.join(", ")
            ),
        }
    }
}

/// Headline and optional subtext for each edge rule. `Mixed` has none.
pub fn outcome_text(outcome: Outcome) -> (Option<&'static str>, Option<&'static str>) {
    match outcome {
        Outcome::EmptyFollowing => (
            Some("You aren't following anyone yet. Nothing to check here."),
            None,
        ),
        Outcome::EmptyFollowers => (Some("No one follows you yet. Clean slate, clean feed."), None),
        Outcome::Mutual => (
            Some("Everyone you follow follows you back, and you follow everyone back."),
            Some("Nice work. Looks like you've curated your feed with intention."),
        ),
        Outcome::CircleComplete => (
            Some("Everyone you follow follows you back. Your circle is complete."),
            None,
        ),
        Outcome::SomeDontFollowBack => (
            Some("Some accounts you follow don't follow you back."),
            None,
        ),
        Outcome::Mixed => (None, None),
    }
}

/// Package the reconciler output with warnings into the final result.
/// Repeated warnings collapse to one line.
pub fn assemble(reconciled: Reconciled, warnings: &[ReconWarning], stats: ReconStats) -> ReconciliationResult {
    let (message, subtext) = outcome_text(reconciled.outcome);

    let mut lines: Vec<String> = Vec::with_capacity(warnings.len());
    for warning in warnings {
        let line = warning.to_string();
        if !lines.contains(&line) {
            lines.push(line);
        }
    }

    ReconciliationResult {
        not_following_back: reconciled.not_following_back,
        you_dont_follow_back: reconciled.you_dont_follow_back,
        message: message.map(str::to_string),
        subtext: subtext.map(str::to_string),
        warnings: lines,
        outcome: reconciled.outcome,
        stats,
    }
}
