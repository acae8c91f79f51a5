use rand::seq::SliceRandom;
use rand::Rng;

/// An outbound message: a single string, or a non-empty candidate set from
/// which one string is chosen uniformly at random at send time.
///
/// The choice deliberately happens at send time rather than when the reply
/// is built, so identical classification paths still produce varied phrasing
/// across a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Choice(Vec<String>),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    pub fn choice<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Reply::Choice(candidates.into_iter().map(Into::into).collect())
    }

    /// Resolve the reply to the string that will actually be sent.
    pub fn pick<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a str {
        match self {
            Reply::Text(s) => s,
            Reply::Choice(candidates) => candidates
                .choose(rng)
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

impl From<Vec<String>> for Reply {
    fn from(candidates: Vec<String>) -> Self {
        Reply::Choice(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_returns_the_single_text() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Reply::text("Hello.").pick(&mut rng), "Hello.");
    }

    #[test]
    fn pick_always_draws_from_the_candidate_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let reply = Reply::choice(["a", "b", "c"]);
        for _ in 0..50 {
            let picked = reply.pick(&mut rng);
            assert!(["a", "b", "c"].contains(&picked));
        }
    }
}
