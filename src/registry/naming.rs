//! Canonical naming policy.
//!
//! A type's canonical name is its namespace-qualified local name with
//! separator characters normalized, or the local name alone when the
//! namespace matches a configured strip prefix. The canonical name is the
//! registry key: two descriptors with the same canonical name are the same
//! model regardless of how they were reached.

/// Replace namespace separator characters with underscores so canonical
/// names are single identifiers.
pub(super) fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '/' | '.' | '[' | ']' => '_',
            other => other,
        })
        .collect()
}

/// Build the canonical name for a `(namespace, local)` pair under the given
/// strip-prefix list.
pub(super) fn canonical(strip_prefixes: &[String], namespace: &str, local: &str) -> String {
    let omit_namespace = namespace.is_empty()
        || strip_prefixes
            .iter()
            .any(|prefix| namespace.starts_with(prefix.as_str()));
    if omit_namespace {
        normalize(local)
    } else {
        normalize(&format!("{namespace}/{local}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_replaces_separators() {
        assert_eq!(normalize("map[string]Pence"), "map_string_Pence");
        assert_eq!(normalize("github.com/acme/pay"), "github_com_acme_pay");
    }

    #[test]
    fn canonical_qualifies_with_namespace() {
        assert_eq!(
            canonical(&[], "github.com/acme/pay", "Pence"),
            "github_com_acme_pay_Pence"
        );
    }

    #[test]
    fn canonical_strips_configured_prefixes() {
        let strip = vec!["github.com/acme".to_string()];
        assert_eq!(canonical(&strip, "github.com/acme/pay", "Pence"), "Pence");
        assert_eq!(
            canonical(&strip, "github.com/other/pay", "Pence"),
            "github_com_other_pay_Pence"
        );
    }

    #[test]
    fn empty_namespace_uses_local_name_only() {
        assert_eq!(canonical(&[], "", "int64"), "int64");
    }
}
