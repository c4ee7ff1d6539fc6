use crate::{Tx, compute_fee, cut, cut_middle, escape_html, to_btc, to_kb};

use proptest::prelude::*;

#[test]
fn test_cut_appends_ellipsis() {
    assert_eq!(cut("1BoatSLRHtKNngkdXEeobR76b53LETtpyT", 10), "1BoatSLRHt...");
    assert_eq!(cut("abc", 10), "abc...");
}

#[test]
fn test_cut_middle_keeps_both_ends() {
    assert_eq!(cut_middle("0123456789abcdef", 4), "0123...cdef");
    assert_eq!(cut_middle("short", 4), "short");
}

#[test]
fn test_to_kb_and_to_btc() {
    assert_eq!(to_kb(2048), "2.000");
    assert_eq!(to_kb(258), "0.252");
    assert_eq!(to_btc(150_000_000), "1.50000000");
    assert_eq!(to_btc(1), "0.00000001");
}

#[test]
fn test_compute_fee() {
    let tx = Tx {
        hash: "ab".into(),
        total_in: 100_010_000,
        total_out: 100_000_000,
        ..Default::default()
    };
    assert_eq!(compute_fee(&tx), "0.0001");

    let coinbase = Tx {
        hash: "cd".into(),
        total_out: 5_000_000_000,
        ..Default::default()
    };
    assert_eq!(compute_fee(&coinbase), "0");
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html("<a href=\"x\">'&'</a>"),
        "&lt;a href=&#34;x&#34;&gt;&#39;&amp;&#39;&lt;/a&gt;"
    );
}

proptest! {
    #[test]
    fn given_any_text_when_escaped_then_no_markup_remains(input in ".*") {
        let escaped = escape_html(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
    }
}
