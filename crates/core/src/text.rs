//! Line decoding for the tab-delimited extract files.
//!
//! The extract producer cannot emit non-ASCII text, so it writes distinctive `__NAME__` tokens
//! in place of accented letters, currency signs, typographic punctuation and embedded line
//! feeds. Decoding restores those characters and then splits the line into fields.

use crate::constants::FIELD_DELIMITER;

/// Token to character table, applied in order.
///
/// Each token is searched for in the output of the previous substitutions. No replacement
/// character contains an underscore, so no token can be formed by an earlier replacement.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("__COPYRIGHT__", "\u{00a9}"),
    ("__REGISTERED__", "\u{00ae}"),
    ("__YEN__", "\u{00a5}"),
    ("__POUND__", "\u{00a3}"),
    ("__DEGREE__", "\u{00b0}"),
    ("__aGRAVE__", "\u{00e0}"),
    ("__eGRAVE__", "\u{00e8}"),
    ("__iGRAVE__", "\u{00ec}"),
    ("__oGRAVE__", "\u{00f2}"),
    ("__uGRAVE__", "\u{00f9}"),
    ("__AGRAVE__", "\u{00c0}"),
    ("__EGRAVE__", "\u{00c8}"),
    ("__IGRAVE__", "\u{00cc}"),
    ("__OGRAVE__", "\u{00d2}"),
    ("__UGRAVE__", "\u{00d9}"),
    ("__aCIRCUMFLEX__", "\u{00e2}"),
    ("__eCIRCUMFLEX__", "\u{00ea}"),
    ("__iCIRCUMFLEX__", "\u{00ee}"),
    ("__oCIRCUMFLEX__", "\u{00f4}"),
    ("__uCIRCUMFLEX__", "\u{00fb}"),
    ("__ACIRCUMFLEX__", "\u{00c2}"),
    ("__ECIRCUMFLEX__", "\u{00ca}"),
    ("__ICIRCUMFLEX__", "\u{00ce}"),
    ("__OCIRCUMFLEX__", "\u{00d4}"),
    ("__UCIRCUMFLEX__", "\u{00db}"),
    ("__LATINaDIAERESIS__", "\u{00e4}"),
    ("__eDIAERESIS__", "\u{00eb}"),
    ("__iDIAERESIS__", "\u{00ef}"),
    ("__oDIAERESIS__", "\u{00f6}"),
    ("__uDIAERESIS__", "\u{00fc}"),
    ("__yDIAERESIS__", "\u{00ff}"),
    ("__ADIAERESIS__", "\u{00c4}"),
    ("__EDIAERESIS__", "\u{00cb}"),
    ("__ODIAERESIS__", "\u{00d6}"),
    ("__UDIAERESIS__", "\u{00dc}"),
    ("__YDIAERESIS__", "\u{0178}"),
    ("__aTILDE__", "\u{00e3}"),
    ("__oTILDE__", "\u{00f5}"),
    ("__nTILDE__", "\u{00f1}"),
    ("__aRING__", "\u{00e5}"),
    ("__oSTROKE__", "\u{00f8}"),
    ("__sCARON__", "\u{0161}"),
    ("__ATILDE__", "\u{00c3}"),
    ("__OTILDE__", "\u{00d5}"),
    ("__NTILDE__", "\u{00d1}"),
    ("__ARING__", "\u{00c5}"),
    ("__OSTROKE__", "\u{00d8}"),
    ("__cCEDILLA__", "\u{00e7}"),
    ("__CCEDILLA__", "\u{00c7}"),
    ("__DIAERESIS__", "\u{00a8}"),
    ("__TRADEMARK__", "\u{2122}"),
    ("__EURO__", "\u{20ac}"),
    ("__CENT__", "\u{00a2}"),
    ("__CURRENCY__", "\u{00a4}"),
    ("__GAMMA__", "\u{0194}"),
    ("__RH_SINGLE__", "\u{2019}"),
    ("__LH_SINGLE__", "\u{2018}"),
    ("__LINE_FEED__", "\n"),
    ("__DASH__", "\u{2013}"),
    ("__CURVED_APOSTROPHE__", "\u{055a}"),
];

/// Replace every substitution token in `raw`, in table order.
pub fn substitute(raw: &str) -> String {
    let mut text = raw.to_string();
    for (token, replacement) in SUBSTITUTIONS {
        if text.contains(token) {
            text = text.replace(token, replacement);
        }
    }
    text
}

/// Decode one raw line into its field sequence.
///
/// Total over any input: a line without delimiters is a single field, and a line with fewer
/// fields than its schema simply yields a shorter sequence. A substituted line feed stays
/// inside its field.
pub fn normalise_line(raw: &str) -> Vec<String> {
    substitute(raw)
        .split(FIELD_DELIMITER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_tabs_and_keeps_empty_fields() {
        let fields = normalise_line("RX1\t\tB81001\t");
        assert_eq!(fields, vec!["RX1", "", "B81001", ""]);
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        assert_eq!(normalise_line(""), vec![""]);
    }

    #[test]
    fn replaces_tokens_with_characters() {
        let fields = normalise_line("Caf__eGRAVE__\t__POUND__5__DASH__10\tM__LATINaDIAERESIS__dchen");
        assert_eq!(fields, vec!["Caf\u{e8}", "\u{a3}5\u{2013}10", "M\u{e4}dchen"]);
    }

    #[test]
    fn replaces_every_occurrence_of_a_token() {
        assert_eq!(substitute("__EURO__1 __EURO__2"), "\u{20ac}1 \u{20ac}2");
    }

    #[test]
    fn substitution_is_case_sensitive() {
        assert_eq!(substitute("__euro__"), "__euro__");
        assert_eq!(substitute("__aGRAVE__ __AGRAVE__"), "\u{e0} \u{c0}");
    }

    #[test]
    fn line_feed_token_does_not_split_fields() {
        let fields = normalise_line("Take one__LINE_FEED__at night\tnext");
        assert_eq!(fields, vec!["Take one\nat night", "next"]);
    }

    #[test]
    fn no_replacement_introduces_a_token() {
        for (_, replacement) in SUBSTITUTIONS {
            assert!(!replacement.contains('_'));
        }
    }
}
