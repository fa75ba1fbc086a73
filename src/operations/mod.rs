//! Operations module runs the command-line actions against a subreddit

pub mod auth;
pub mod flair;
pub mod widgets;

/// Prefix a bare subreddit name with `r/` for display.
pub(crate) fn display_subreddit(subreddit: &str) -> String {
    if subreddit.starts_with("r/") {
        subreddit.to_string()
    } else {
        format!("r/{}", subreddit)
    }
}

#[cfg(test)]
mod tests {
    use super::display_subreddit;

    #[test]
    fn display_subreddit_adds_prefix_once() {
        assert_eq!(display_subreddit("rust"), "r/rust");
        assert_eq!(display_subreddit("r/rust"), "r/rust");
    }
}
