use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use super::{SubResult, Verdict, Verifier, VerifyOptions};
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;
use crate::smtp::{MailboxProbe, SmtpOutcome};

/// Returns a canned outcome and remembers which host it was asked about.
struct StubProber {
    outcome: SmtpOutcome,
    hosts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubProber {
    fn returning(outcome: SmtpOutcome) -> Self {
        Self {
            outcome,
            hosts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hosts(&self) -> Vec<String> {
        self.hosts.lock().expect("hosts lock").clone()
    }
}

impl MailboxProbe for StubProber {
    fn probe(&self, host: &str, _email: &str) -> SmtpOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hosts.lock().expect("hosts lock").push(host.to_string());
        self.outcome.clone()
    }
}

fn single_mx() -> StubResolver {
    StubResolver::records(vec![MxRecord::new(10, "mx.example.com")])
}

fn verifier(resolver: StubResolver, outcome: SmtpOutcome) -> Verifier<StubResolver, StubProber> {
    Verifier::new(resolver, StubProber::returning(outcome))
}

#[test]
fn accepted_mailbox_is_valid() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    let result = verifier.verify("test@example.com");
    assert_eq!(result.result, Verdict::Valid);
    assert_eq!(result.result_code, 1);
    assert_eq!(result.subresult, SubResult::MailboxExists);
    assert_eq!(result.email, "test@example.com");
    assert_eq!(result.domain.as_deref(), Some("example.com"));
    assert_eq!(result.mx_records, vec!["mx.example.com"]);
    assert_eq!(result.error, None);
    assert_eq!(result.did_you_mean, None);
    assert!(result.is_valid());
}

#[test]
fn missing_at_is_invalid_syntax_without_io() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    for input in ["testgmail.com", "test@@gmail.com", "", "   "] {
        let result = verifier.verify(input);
        assert_eq!(result.result, Verdict::Invalid, "{input:?}");
        assert_eq!(result.result_code, 3);
        assert_eq!(result.subresult, SubResult::InvalidSyntax, "{input:?}");
        assert_eq!(result.domain, None);
        assert!(result.mx_records.is_empty());
        assert_eq!(result.error.as_deref(), Some("Email syntax is invalid"));
    }
    assert_eq!(verifier.resolver.call_count(), 0);
    assert_eq!(verifier.prober.call_count(), 0);
}

#[test]
fn double_dots_are_invalid_syntax() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    let result = verifier.verify("test..user@gmail.com");
    assert_eq!(result.subresult, SubResult::InvalidSyntax);
}

#[test]
fn typo_stops_before_dns() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    let result = verifier.verify("user@gmial.com");
    assert_eq!(result.result, Verdict::Invalid);
    assert_eq!(result.subresult, SubResult::TypoDetected);
    assert_eq!(result.did_you_mean.as_deref(), Some("user@gmail.com"));
    assert_eq!(result.domain.as_deref(), Some("gmial.com"));
    assert_eq!(
        result.error.as_deref(),
        Some("Possible typo detected. Did you mean user@gmail.com?")
    );
    assert!(result.mx_records.is_empty());
    assert_eq!(verifier.resolver.call_count(), 0);
}

#[test]
fn capitalised_provider_is_a_typo() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    let result = verifier.verify("user@Gmail.com");
    assert_eq!(result.result, Verdict::Invalid);
    assert_eq!(result.subresult, SubResult::TypoDetected);
    assert_eq!(result.did_you_mean.as_deref(), Some("user@gmail.com"));
    assert_eq!(verifier.resolver.call_count(), 0);
}

#[test]
fn reference_domains_come_from_options() {
    let options = VerifyOptions {
        reference_domains: vec!["proton.me".to_string()],
        ..VerifyOptions::default()
    };
    let verifier = verifier(single_mx(), SmtpOutcome::accepted()).with_options(options);
    assert_eq!(
        verifier.verify("user@protn.me").did_you_mean.as_deref(),
        Some("user@proton.me")
    );
    // gmail.com is no longer a reference domain
    assert_eq!(
        verifier.verify("user@gmial.com").subresult,
        SubResult::MailboxExists
    );
}

#[test]
fn no_mx_records() {
    let verifier = verifier(StubResolver::records(Vec::new()), SmtpOutcome::accepted());
    let result = verifier.verify("test@example.com");
    assert_eq!(result.result, Verdict::Invalid);
    assert_eq!(result.subresult, SubResult::DomainHasNoMx);
    assert!(result.mx_records.is_empty());
    assert_eq!(result.domain.as_deref(), Some("example.com"));
    assert_eq!(
        result.error.as_deref(),
        Some("No MX records found for domain")
    );
    assert_eq!(verifier.prober.call_count(), 0);
}

#[test]
fn resolution_failure_carries_diagnostic() {
    let verifier = verifier(
        StubResolver::failing("queryMx ENOTFOUND invalid-domain-xyz.com"),
        SmtpOutcome::accepted(),
    );
    let result = verifier.verify("test@invalid-domain-xyz.com");
    assert_eq!(result.result, Verdict::Invalid);
    assert_eq!(result.subresult, SubResult::DomainResolutionFailed);
    assert!(result.mx_records.is_empty());
    let error = result.error.expect("error message");
    assert!(
        error.contains("queryMx ENOTFOUND invalid-domain-xyz.com"),
        "unexpected error: {error}"
    );
    assert_eq!(verifier.prober.call_count(), 0);
}

#[test]
fn long_local_part_reaches_dns() {
    let verifier = verifier(
        StubResolver::failing("Domain not found"),
        SmtpOutcome::accepted(),
    );
    let email = format!("{}@example.com", "a".repeat(250));
    let result = verifier.verify(&email);
    assert_eq!(result.subresult, SubResult::DomainResolutionFailed);
}

#[test]
fn rejected_mailbox_is_invalid() {
    let verifier = verifier(single_mx(), SmtpOutcome::rejected());
    let result = verifier.verify("nonexistent@example.com");
    assert_eq!(result.result, Verdict::Invalid);
    assert_eq!(result.subresult, SubResult::MailboxDoesNotExist);
    assert_eq!(result.mx_records, vec!["mx.example.com"]);
    assert_eq!(result.error, None);
}

#[test]
fn greylisting_is_unknown() {
    let verifier = verifier(single_mx(), SmtpOutcome::greylisted());
    let result = verifier.verify("grey@example.com");
    assert_eq!(result.result, Verdict::Unknown);
    assert_eq!(result.result_code, 6);
    assert_eq!(result.subresult, SubResult::Greylisted);
    assert_eq!(result.error, None);
}

#[test]
fn timeout_is_connection_error() {
    let verifier = verifier(
        single_mx(),
        SmtpOutcome::timeout("connection to 10.0.0.1:25 failed: timed out"),
    );
    let result = verifier.verify("timeout@example.com");
    assert_eq!(result.result, Verdict::Unknown);
    assert_eq!(result.subresult, SubResult::ConnectionError);
    assert_eq!(result.error.as_deref(), Some("Connection timed out"));
}

#[test]
fn probe_error_message_is_kept() {
    let verifier = verifier(single_mx(), SmtpOutcome::error("Connection refused"));
    let result = verifier.verify("error@example.com");
    assert_eq!(result.result, Verdict::Unknown);
    assert_eq!(result.subresult, SubResult::ConnectionError);
    assert_eq!(result.error.as_deref(), Some("Connection refused"));
}

#[test]
fn probes_only_the_most_preferred_host() {
    let resolver = StubResolver::records(vec![
        MxRecord::new(30, "backup.example.com"),
        MxRecord::new(5, "primary.example.com"),
        MxRecord::new(20, "secondary.example.com"),
    ]);
    let verifier = verifier(resolver, SmtpOutcome::timeout("timed out"));
    let result = verifier.verify("user@example.com");
    assert_eq!(
        result.mx_records,
        vec![
            "primary.example.com",
            "secondary.example.com",
            "backup.example.com"
        ]
    );
    assert_eq!(verifier.prober.hosts(), vec!["primary.example.com"]);
    assert_eq!(verifier.prober.call_count(), 1);
}

#[test]
fn execution_time_is_non_negative_at_every_stage() {
    let cases = [
        ("bad", SubResult::InvalidSyntax),
        ("user@gmial.com", SubResult::TypoDetected),
        ("user@example.com", SubResult::MailboxExists),
    ];
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    for (input, expected) in cases {
        let result = verifier.verify(input);
        assert_eq!(result.subresult, expected);
        assert!(result.execution_time >= 0.0);
        // millisecond precision
        let millis = result.execution_time * 1000.0;
        assert!((millis - millis.round()).abs() < 1e-6);
    }
}

#[test]
fn concurrent_calls_share_one_verifier() {
    let verifier = verifier(single_mx(), SmtpOutcome::accepted());
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let verifier = &verifier;
                scope.spawn(move || verifier.verify(&format!("user{i}@example.com")))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().expect("verification thread");
            assert_eq!(result.email, format!("user{i}@example.com"));
            assert_eq!(result.subresult, SubResult::MailboxExists);
        }
    });
    assert_eq!(verifier.prober.call_count(), 8);
}

proptest! {
    #[test]
    fn inputs_without_single_at_never_touch_the_network(input in "[^@]{0,16}(@@[^@]{0,8})?") {
        let verifier = verifier(single_mx(), SmtpOutcome::accepted());
        let result = verifier.verify(&input);
        prop_assert_eq!(result.subresult, SubResult::InvalidSyntax);
        prop_assert_eq!(verifier.resolver.call_count(), 0);
        prop_assert_eq!(verifier.prober.call_count(), 0);
    }

    #[test]
    fn result_always_matches_subresult(pick in 0usize..5) {
        let outcome = match pick {
            0 => SmtpOutcome::accepted(),
            1 => SmtpOutcome::rejected(),
            2 => SmtpOutcome::greylisted(),
            3 => SmtpOutcome::timeout("t"),
            _ => SmtpOutcome::error("e"),
        };
        let verifier = verifier(single_mx(), outcome);
        let result = verifier.verify("user@example.com");
        prop_assert_eq!(result.result, result.subresult.verdict());
        prop_assert_eq!(result.result_code, result.result.code());
        prop_assert!(!result.mx_records.is_empty());
    }
}
