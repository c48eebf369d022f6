//! `@mention` scanner for GitHub free-form text.
//!
//! Recognises plain user mentions (`@login`) and single-level team mentions
//! (`@org/team`). A token starts with an ASCII alphanumeric right after the
//! `@` and then extends over:
//!
//! - ASCII alphanumerics,
//! - a `-` that is followed by an ASCII alphanumeric,
//! - one `/` that is followed by an ASCII alphanumeric.
//!
//! Anything else (whitespace, punctuation, non-ASCII letters) ends the token
//! without being consumed. Chatwork has no counterpart for non-Latin logins,
//! so `@山田` yields nothing.

/// Extract the distinct mention tokens from `text` in first-occurrence order.
///
/// Equality is case-sensitive: `@mechiru` and `@Mechiru` are two tokens.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut found: Vec<String> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '@' {
            continue;
        }
        match chars.get(i) {
            Some(first) if first.is_ascii_alphanumeric() => {}
            _ => continue,
        }

        let token = scan_token(&chars, &mut i);
        if !found.contains(&token) {
            found.push(token);
        }
    }

    found
}

/// Consume one token starting at `chars[*pos]`, which must be alphanumeric.
/// On return `*pos` points at the first character not taken.
fn scan_token(chars: &[char], pos: &mut usize) -> String {
    let mut token = String::new();
    token.push(chars[*pos]);
    *pos += 1;

    let mut has_slash = false;
    while let Some(&c) = chars.get(*pos) {
        let next_is_alnum = chars
            .get(*pos + 1)
            .is_some_and(|n| n.is_ascii_alphanumeric());
        match c {
            c if c.is_ascii_alphanumeric() => {}
            '-' if next_is_alnum => {}
            '/' if next_is_alnum && !has_slash => has_slash = true,
            _ => break,
        }
        token.push(c);
        *pos += 1;
    }

    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(s: &str) -> String {
        extract_mentions(s).join(" ")
    }

    #[test]
    fn test_empty_and_bare_at() {
        assert!(extract_mentions("").is_empty());
        assert!(extract_mentions("@").is_empty());
        assert!(extract_mentions("@@").is_empty());
        assert!(extract_mentions("mail me at foo @ bar").is_empty());
    }

    #[test]
    fn test_plain_mentions() {
        assert_eq!(joined("@mechiru"), "mechiru");
        assert_eq!(joined("@mechiru hi"), "mechiru");
        assert_eq!(joined("@Mechiru"), "Mechiru");
        assert_eq!(joined("cc @alice, @bob."), "alice bob");
    }

    #[test]
    fn test_hyphen_rules() {
        assert_eq!(joined("@-mechiru"), "");
        assert_eq!(joined("@mechiru-"), "mechiru");
        assert_eq!(joined("@mechiru- @mechiru-"), "mechiru");
        assert_eq!(joined("@me-chi-ru"), "me-chi-ru");
        assert_eq!(joined("@me--chiru"), "me");
    }

    #[test]
    fn test_case_sensitive_dedup() {
        assert_eq!(
            extract_mentions("@mechiru\n@Mechiru\n@mechirU"),
            vec!["mechiru", "Mechiru", "mechirU"]
        );
    }

    #[test]
    fn test_repeated_mentions_keep_first_occurrence_order() {
        assert_eq!(
            extract_mentions("@b @a @b @c @a"),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        assert_eq!(joined("@山田"), "");
        assert_eq!(joined("@yamada山田"), "yamada");
        assert_eq!(joined("山田 @taro さん"), "taro");
    }

    #[test]
    fn test_team_mentions() {
        assert_eq!(joined("@org/team"), "org/team");
        assert_eq!(joined("@org/-team"), "org");
        assert_eq!(joined("@org/team-"), "org/team");
        assert_eq!(joined("@org/team/child"), "org/team");
        assert_eq!(joined("@org/"), "org");
        assert_eq!(joined("@org/te-am"), "org/te-am");
    }

    #[test]
    fn test_adjacent_mentions() {
        assert_eq!(joined("@alice@bob"), "alice bob");
        assert_eq!(joined("(@alice)"), "alice");
    }

    #[test]
    fn test_tokens_only_contain_allowed_characters() {
        let input = "@a_b @c.d @e/f/g @h--i @j-/k @l!m @ñ @o\u{301}p";
        for token in extract_mentions(input) {
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/'));
            assert!(token.matches('/').count() <= 1);
            assert!(!token.ends_with('-') && !token.ends_with('/'));
        }
    }
}
