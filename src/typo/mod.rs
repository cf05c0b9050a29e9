//! Provider-domain typo detection (`user@gmial.com` → `user@gmail.com`).

mod distance;

pub use distance::edit_distance;

/// Consumer webmail domains checked by [`suggest_correction`], in tie-break order.
pub const DEFAULT_REFERENCE_DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "me.com",
    "msn.com",
    "live.com",
];

/// Largest edit distance still reported as a typo.
pub const MAX_TYPO_DISTANCE: usize = 2;

/// Suggests `local@provider` when the domain of `email` is within
/// [`MAX_TYPO_DISTANCE`] edits of one of [`DEFAULT_REFERENCE_DOMAINS`].
pub fn suggest_correction(email: &str) -> Option<String> {
    suggest_correction_with(email, &DEFAULT_REFERENCE_DOMAINS)
}

/// Same as [`suggest_correction`] against a caller-supplied reference list.
///
/// An exact match with any reference domain yields `None` without computing a
/// single distance. The comparison is byte-for-byte, so `Gmail.com` is a typo. Ties go to the earliest entry.
pub fn suggest_correction_with<S: AsRef<str>>(email: &str, reference: &[S]) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    if domain.is_empty() {
        return None;
    }

    if reference.iter().any(|candidate| candidate.as_ref() == domain) {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    for candidate in reference {
        let candidate = candidate.as_ref();
        let distance = edit_distance(domain, candidate);
        if distance > MAX_TYPO_DISTANCE {
            continue;
        }
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(provider, _)| format!("{local}@{provider}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn suggests_gmail_for_gmial() {
        assert_eq!(
            suggest_correction("user@gmial.com").as_deref(),
            Some("user@gmail.com")
        );
        assert_eq!(
            suggest_correction("user@hotmial.com").as_deref(),
            Some("user@hotmail.com")
        );
    }

    #[test]
    fn exact_match_short_circuits() {
        assert_eq!(suggest_correction("user@gmail.com"), None);
        assert_eq!(suggest_correction("user@live.com"), None);
    }

    #[test]
    fn mixed_case_provider_is_a_typo() {
        assert_eq!(edit_distance("Gmail.com", "gmail.com"), 1);
        assert_eq!(
            suggest_correction("user@Gmail.com").as_deref(),
            Some("user@gmail.com")
        );
        assert_eq!(suggest_correction("User@GMAIL.COM"), None);
    }

    #[test]
    fn exact_match_beats_nearby_reference() {
        // "me.com" is also 2 edits from "msn.com"
        assert_eq!(suggest_correction("user@me.com"), None);
    }

    #[test]
    fn distance_three_never_qualifies() {
        assert_eq!(edit_distance("gxxxl.com", "gmail.com"), 3);
        assert_eq!(suggest_correction("user@gxxxl.com"), None);
    }

    #[test]
    fn distance_two_qualifies() {
        assert_eq!(
            suggest_correction("user@gmal.co").as_deref(),
            Some("user@gmail.com")
        );
    }

    #[test]
    fn ties_keep_reference_order() {
        // one edit from both entries; the first listed wins
        let reference = ["abc.com", "abd.com"];
        assert_eq!(
            suggest_correction_with("x@abe.com", &reference).as_deref(),
            Some("x@abc.com")
        );
        let reversed = ["abd.com", "abc.com"];
        assert_eq!(
            suggest_correction_with("x@abe.com", &reversed).as_deref(),
            Some("x@abd.com")
        );
    }

    #[test]
    fn closer_later_entry_beats_earlier_one() {
        let reference = ["mail.cm", "mail.com"];
        assert_eq!(
            suggest_correction_with("x@mail.con", &reference).as_deref(),
            Some("x@mail.com")
        );
    }

    #[test]
    fn missing_domain_yields_nothing() {
        assert_eq!(suggest_correction("user"), None);
        assert_eq!(suggest_correction("user@"), None);
    }

    #[test]
    fn unrelated_domain_yields_nothing() {
        assert_eq!(suggest_correction("user@example.com"), None);
    }

    #[test]
    fn custom_reference_list() {
        let reference = vec!["proton.me".to_string()];
        assert_eq!(
            suggest_correction_with("a@protn.me", &reference).as_deref(),
            Some("a@proton.me")
        );
        assert_eq!(suggest_correction_with("a@gmial.com", &reference), None);
    }

    proptest! {
        #[test]
        fn suggestion_stays_within_budget(local in "[a-z]{1,6}", domain in "[a-z.]{1,12}") {
            let email = format!("{local}@{domain}");
            if let Some(suggestion) = suggest_correction(&email) {
                let (_, suggested) = suggestion.split_once('@').expect("suggestion has '@'");
                prop_assert!(edit_distance(&domain, suggested) <= MAX_TYPO_DISTANCE);
                prop_assert!(DEFAULT_REFERENCE_DOMAINS.contains(&suggested));
            }
        }
    }
}
