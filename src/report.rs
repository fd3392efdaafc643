//! Plain text rendering of an activity digest

use std::fmt;

use itertools::Itertools;

use crate::digest::EventsDigest;

pub struct Report<'a>(pub &'a EventsDigest);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest = self.0;
        if digest.is_empty() {
            return f.write_str("User has no activity");
        }

        let pushes = digest
            .commits_pushed
            .iter()
            .map(|(repo, count)| format!("Pushed {count} {} to {repo}", plural(*count, "commit")));
        let issue = digest
            .last_issue_opened_repo
            .iter()
            .map(|repo| format!("Opened a new issue in {repo}"));
        let star = digest.last_star.iter().map(|repo| format!("Starred {repo}"));

        write!(f, "{}", pushes.chain(issue).chain(star).join("\n"))
    }
}

fn plural(count: u64, noun: &str) -> String {
    if count == 1 { noun.to_string() } else { format!("{noun}s") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest() {
        assert_eq!(Report(&EventsDigest::default()).to_string(), "User has no activity");
    }

    #[test]
    fn full_digest() {
        let digest = EventsDigest {
            commits_pushed: vec![("octo/b".into(), 3), ("octo/a".into(), 1)],
            last_issue_opened_repo: Some("octo/issues".into()),
            last_star: Some("rust-lang/rust".into()),
        };

        assert_eq!(
            Report(&digest).to_string(),
            "Pushed 3 commits to octo/b\n\
             Pushed 1 commit to octo/a\n\
             Opened a new issue in octo/issues\n\
             Starred rust-lang/rust"
        );
    }

    #[test]
    fn star_only() {
        let digest = EventsDigest {
            last_star: Some("octo/star".into()),
            ..Default::default()
        };

        assert_eq!(Report(&digest).to_string(), "Starred octo/star");
    }
}
