//! Join (foreign-key) column inference from IRI templates.
//!
//! Precedence, first match wins:
//!
//! 1. `{Name}`
//! 2. `$(Name)`
//! 3. `$[Name]`
//! 4. the final `/` segment, unless the template still carries `$(base_iri)`
//!
//! Each rule skips blank names and `base_iri` before the next one is tried.
//! Anything else falls back to `<ClassLocalName>ID`.

use std::sync::OnceLock;

use regex::Regex;

use crate::iri::local_name;
use crate::model::UNKNOWN;

const BASE_IRI: &str = "base_iri";
const BASE_IRI_TOKEN: &str = "$(base_iri)";

fn brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").unwrap())
}

fn paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\(([^)]+)\)").unwrap())
}

fn bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\[([^\]]+)\]").unwrap())
}

/// A placeholder name usable as a column: trimmed, non-blank and not
/// `base_iri`.
fn usable(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty() && name != BASE_IRI).then_some(name)
}

fn first_usable<'t>(re: &Regex, template: &'t str) -> Option<&'t str> {
    re.captures_iter(template)
        .filter_map(|c| c.get(1))
        .find_map(|m| usable(m.as_str()))
}

/// First usable `{placeholder}` in a template, if any.
pub fn first_brace_placeholder(template: &str) -> Option<&str> {
    first_usable(brace_re(), template)
}

/// First usable `$(placeholder)` in a template; `$(base_iri)` is skipped.
pub fn first_paren_placeholder(template: &str) -> Option<&str> {
    first_usable(paren_re(), template)
}

fn first_bracket_placeholder(template: &str) -> Option<&str> {
    first_usable(bracket_re(), template)
}

fn last_path_segment(template: &str) -> Option<&str> {
    if template.contains(BASE_IRI_TOKEN) {
        return None;
    }
    template.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Local name of a class IRI or CURIE (`ex:Loan` → `Loan`).
pub fn class_local_name(class_iri: &str) -> &str {
    let local = local_name(class_iri.trim());
    let local = local.rsplit(':').next().unwrap_or(local);
    if local.is_empty() {
        UNKNOWN
    } else {
        local
    }
}

/// Infer the join column for a relationship whose target is built from
/// `template`. Total: always returns a non-empty column name.
pub fn infer_join_column(template: &str, target_class: &str) -> String {
    let template = template.trim();
    let resolved = first_brace_placeholder(template)
        .or_else(|| first_paren_placeholder(template))
        .or_else(|| first_bracket_placeholder(template))
        .or_else(|| last_path_segment(template).and_then(usable));

    match resolved {
        Some(name) => name.to_string(),
        None => format!("{}ID", class_local_name(target_class)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_placeholder_wins() {
        assert_eq!(infer_join_column("{BorrowerID}", "ex:Borrower"), "BorrowerID");
        assert_eq!(
            infer_join_column("http://ex.org/loan/{LoanID}/$(Other)", "ex:Loan"),
            "LoanID"
        );
    }

    #[test]
    fn paren_placeholder_skips_base_iri() {
        assert_eq!(infer_join_column("$(LoanID)", "ex:Loan"), "LoanID");
        assert_eq!(
            infer_join_column("$(base_iri)property/$(PropertyID)", "ex:Property"),
            "PropertyID"
        );
    }

    #[test]
    fn blank_placeholders_fall_through_to_later_rules() {
        assert_eq!(infer_join_column("{ }/$(LoanID)", "ex:Loan"), "LoanID");
        assert_eq!(infer_join_column("{ }/$[Loan Number]", "ex:Loan"), "Loan Number");
        assert_eq!(infer_join_column("http://ex.org/{ }/LoanNo", "ex:Loan"), "LoanNo");
        assert_eq!(
            infer_join_column("{base_iri}borrower/{BorrowerID}", "ex:Borrower"),
            "BorrowerID"
        );
    }

    #[test]
    fn bracket_placeholder() {
        assert_eq!(infer_join_column("loan/$[Loan Number]", "ex:Loan"), "Loan Number");
    }

    #[test]
    fn last_segment_used_without_base_iri() {
        assert_eq!(infer_join_column("http://ex.org/branch/BranchCode", "ex:Branch"), "BranchCode");
    }

    #[test]
    fn base_iri_template_falls_back_to_class_name() {
        assert_eq!(infer_join_column("$(base_iri)/x", "ex:Loan"), "LoanID");
        assert_eq!(infer_join_column("$(base_iri)", "http://ex.org/onto#Borrower"), "BorrowerID");
    }

    #[test]
    fn empty_inputs_are_still_resolved() {
        assert_eq!(infer_join_column("", "http://ex.org/Customer"), "CustomerID");
        assert_eq!(infer_join_column("", ""), "UnknownID");
        assert_eq!(infer_join_column("http://ex.org/x/", "ex:Loan"), "LoanID");
    }
}
