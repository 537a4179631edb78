//! Display normalization
//!
//! Templates never see an absent or empty value: every cell is resolved to
//! either its content or one of the fixed markers below before rendering.

use docsmith_core::{id_to_path, NodeKind};

/// Rendered in place of an empty cell or an empty list
pub const NO_ENTRIES: &str = "&nbsp;";

/// Rendered in place of an empty tag list
pub const UNTAGGED: &str = "untagged";

/// Rendered when a macro declares no arguments
pub const NO_ARGUMENTS: &str = "Details are not available for this macro";

/// Separator between identifiers inside one table cell
pub const LINE_BREAK: &str = "<br>";

/// Placeholder for an undocumented object of the given kind
pub fn undocumented(kind: &NodeKind) -> String {
    format!("This {} is not currently documented", kind.as_str())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Object description, or the per-kind placeholder
pub fn describe(description: Option<&str>, kind: &NodeKind) -> String {
    present(description)
        .map(str::to_string)
        .unwrap_or_else(|| undocumented(kind))
}

/// Scalar table cell, or the no-entries marker
pub fn cell(value: Option<&str>) -> String {
    present(value).unwrap_or(NO_ENTRIES).to_string()
}

/// Tag list cell
pub fn tags(tags: &[String]) -> String {
    if tags.is_empty() {
        UNTAGGED.to_string()
    } else {
        tags.join(", ")
    }
}

/// Identifier list as hierarchical paths, one per line
pub fn id_list<S: AsRef<str>>(ids: &[S]) -> String {
    if ids.is_empty() {
        return NO_ENTRIES.to_string();
    }

    ids.iter()
        .map(|id| id_to_path(id.as_ref()))
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// Plain list of names, one per line
pub fn name_list<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    let names: Vec<&str> = names.into_iter().map(String::as_str).collect();
    if names.is_empty() {
        NO_ENTRIES.to_string()
    } else {
        names.join(LINE_BREAK)
    }
}

/// Compiled code with leading blank lines and surrounding whitespace removed
pub fn compiled_code(code: Option<&str>) -> String {
    let code = code.unwrap_or_default();
    let body = code
        .split_inclusive('\n')
        .skip_while(|line| line.trim().is_empty())
        .collect::<String>();
    body.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_differ_by_kind() {
        assert_eq!(describe(None, &NodeKind::Model), "This model is not currently documented");
        assert_eq!(describe(Some(""), &NodeKind::Seed), "This seed is not currently documented");
        assert_eq!(describe(Some("  "), &NodeKind::Source), "This source is not currently documented");
        assert_eq!(describe(None, &NodeKind::Test), "This test is not currently documented");
        assert_eq!(describe(None, &NodeKind::Macro), "This macro is not currently documented");
        assert_eq!(describe(Some("Daily orders"), &NodeKind::Model), "Daily orders");
    }

    #[test]
    fn empty_cells_become_marker() {
        assert_eq!(cell(None), NO_ENTRIES);
        assert_eq!(cell(Some("")), NO_ENTRIES);
        assert_eq!(cell(Some("fivetran")), "fivetran");
    }

    #[test]
    fn tag_cells() {
        assert_eq!(tags(&[]), UNTAGGED);
        assert_eq!(tags(&["finance".to_string(), "daily".to_string()]), "finance, daily");
    }

    #[test]
    fn id_lists_become_paths() {
        let empty: [&str; 0] = [];
        assert_eq!(id_list(&empty), NO_ENTRIES);
        assert_eq!(
            id_list(&["model.shop.orders", "source.shop.raw.payments"]),
            "model/shop/orders<br>source/shop/raw/payments"
        );
    }

    #[test]
    fn leading_blank_lines_are_stripped() {
        assert_eq!(compiled_code(Some("\n\n  \nselect 1\n\nfrom t\n\n")), "select 1\n\nfrom t");
        assert_eq!(compiled_code(None), "");
    }
}
