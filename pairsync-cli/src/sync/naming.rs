//! Target identifier derivation from source project names
//!
//! Runs once when a pairing candidate is selected; the operator may override
//! either field before submission. Pure string work, no state.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());
static NON_CODE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

/// Maximum length of a derived project code
pub const CODE_MAX_LEN: usize = 6;

/// Derived target identity for a pairing candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentifiers {
    pub name: String,
    pub code: String,
}

/// Derive the target project name and short code from the source fields
///
/// The code starts from the source code when one is set and non-empty, else
/// from the name. Idempotent: deriving from already-derived output changes
/// nothing.
pub fn derive(source_name: &str, source_code: Option<&str>) -> DerivedIdentifiers {
    let code_source = source_code
        .filter(|code| !code.is_empty())
        .unwrap_or(source_name);

    DerivedIdentifiers {
        name: derive_name(source_name),
        code: derive_code(code_source),
    }
}

/// Sanitize a source name into a target project name
///
/// Characters outside `[A-Za-z0-9_]` become underscores, runs of underscores
/// collapse to one, and leading/trailing underscores are stripped.
pub fn derive_name(source_name: &str) -> String {
    let name = NON_NAME_CHARS.replace_all(source_name, "_");
    let name = UNDERSCORE_RUNS.replace_all(&name, "_");
    name.trim_matches('_').to_string()
}

/// Sanitize a source code (or name) into a target project code
///
/// Keeps alphanumerics only (underscores included in the strip, unlike the
/// name rule), lower-cases, and truncates to [`CODE_MAX_LEN`] characters.
pub fn derive_code(source: &str) -> String {
    let code = NON_CODE_CHARS.replace_all(source, "").to_lowercase();
    code.chars().take(CODE_MAX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_display_name() {
        let derived = derive("My Show #1!", None);
        assert_eq!(derived.name, "My_Show_1");
        assert_eq!(derived.code, "myshow");
    }

    #[test]
    fn test_code_prefers_source_code() {
        let derived = derive("My Show #1!", Some("SC-01"));
        assert_eq!(derived.name, "My_Show_1");
        assert_eq!(derived.code, "sc01");
    }

    #[test]
    fn test_empty_source_code_falls_back_to_name() {
        let derived = derive("My Show #1!", Some(""));
        assert_eq!(derived.code, "myshow");
    }

    #[test]
    fn test_name_collapses_and_strips_underscores() {
        assert_eq!(derive_name("__a---b__"), "a_b");
        assert_eq!(derive_name("already_clean"), "already_clean");
        assert_eq!(derive_name("!!!"), "");
    }

    #[test]
    fn test_code_strips_underscores_too() {
        assert_eq!(derive_code("snake_case_name"), "snakec");
        assert_eq!(derive_code("ABC"), "abc");
        assert_eq!(derive_code("#!?"), "");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let inputs = [
            ("My Show #1!", None),
            ("Été - Saison 2", None),
            ("plain", Some("PL")),
            ("  spaced  out  ", Some("s o!")),
            ("1234567890", None),
        ];

        for (name, code) in inputs {
            let first = derive(name, code);
            let second = derive(&first.name, Some(&first.code));
            assert_eq!(first, second, "re-deriving ({name:?}, {code:?}) changed the output");
        }
    }

    #[test]
    fn test_code_invariants() {
        let inputs = ["My Show #1!", "Ünïcôdé Prøject", "x", "", "A_B_C_D_E_F_G", "ALLCAPSLONGNAME"];

        for input in inputs {
            let code = derive_code(input);
            assert!(code.len() <= CODE_MAX_LEN, "{input:?} -> {code:?} too long");
            assert!(
                code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "{input:?} -> {code:?} has characters outside lowercase alphanumerics"
            );
        }
    }

    #[test]
    fn test_name_invariants() {
        let inputs = ["My Show #1!", "--lead", "trail--", "a  b", "___", "ok"];

        for input in inputs {
            let name = derive_name(input);
            assert!(
                name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "{input:?} -> {name:?} has characters outside [A-Za-z0-9_]"
            );
            assert!(!name.starts_with('_'), "{input:?} -> {name:?} keeps a leading underscore");
            assert!(!name.ends_with('_'), "{input:?} -> {name:?} keeps a trailing underscore");
            assert!(!name.contains("__"), "{input:?} -> {name:?} keeps an underscore run");
        }
    }
}
