use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::text_utils::{clean, translate_superscript};
use rjmm_core::{AuthorEntry, AuthorLookup};

/// Split an author line into names and their affiliation numbers.
///
/// Each author is a capitalised name directly followed by one or more
/// comma-joined reference numbers, plain or superscript:
/// `"Ion Popescu1, Maria Ionescu2,3"` yields orders `"1"` and `"2,3"`.
/// When no name/number pair is found but the line has commas, every
/// comma-separated segment longer than two characters becomes an author with
/// empty orders. `lookup` is consulted once per author, in order.
pub fn split_authors(raw: &str, lookup: &dyn AuthorLookup) -> Vec<AuthorEntry> {
    static NAME_WITH_ORDERS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"\s*([A-ZÀ-ÖØ-ÞĂÂÎȘȚ][A-Za-zÀ-ÖØ-öø-ÿăâîșțĂÂÎȘȚ.\-'\s]+?)\s*([0-9⁰¹²³⁴⁵⁶⁷⁸⁹]+(?:\s*,\s*[0-9⁰¹²³⁴⁵⁶⁷⁸⁹]+)*)",
        )
        .unwrap()
    });

    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut authors: Vec<AuthorEntry> = NAME_WITH_ORDERS
        .captures_iter(raw)
        .map(|caps| {
            let name = clean(&caps[1]);
            let orders = normalize_orders(&caps[2]);
            let exists = lookup.exists(&name);
            AuthorEntry {
                name,
                orders,
                exists,
            }
        })
        .collect();

    if authors.is_empty() && raw.contains(',') {
        tracing::debug!(raw, "no affiliation numbers on author line, splitting on commas");
        authors = raw
            .split(',')
            .map(clean)
            .filter(|name| name.chars().count() > 2)
            .map(|name| {
                let exists = lookup.exists(&name);
                AuthorEntry {
                    name,
                    orders: String::new(),
                    exists,
                }
            })
            .collect();
    }

    authors
}

/// `"² , ³"` → `"2,3"`: superscripts translated, blanks dropped.
fn normalize_orders(raw: &str) -> String {
    translate_superscript(raw)
        .split(',')
        .map(|part| part.split_whitespace().collect::<String>())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use rjmm_core::DisabledLookup;

    #[test]
    fn test_numbered_authors() {
        let authors = split_authors("Ion Popescu1, Maria Ionescu2,3", &DisabledLookup);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Ion Popescu");
        assert_eq!(authors[0].orders, "1");
        assert_eq!(authors[1].name, "Maria Ionescu");
        assert_eq!(authors[1].orders, "2,3");
        assert!(authors.iter().all(|a| !a.exists));
    }

    #[test]
    fn test_superscript_orders() {
        let authors = split_authors("Ana Pop¹, Dan Radu² , ³", &DisabledLookup);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].orders, "1");
        assert_eq!(authors[1].name, "Dan Radu");
        assert_eq!(authors[1].orders, "2,3");
    }

    #[test]
    fn test_romanian_diacritics_and_initials() {
        let authors = split_authors("Ștefan M. Țăranu1, Ana-Maria O'Neil2", &DisabledLookup);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ștefan M. Țăranu", "Ana-Maria O'Neil"]);
    }

    #[test]
    fn test_comma_fallback() {
        let authors = split_authors("Ion Popescu, Maria Ionescu, Jr", &DisabledLookup);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ion Popescu", "Maria Ionescu"]);
        assert!(authors.iter().all(|a| a.orders.is_empty()));
    }

    #[test]
    fn test_no_authors() {
        assert!(split_authors("", &DisabledLookup).is_empty());
        assert!(split_authors("Anonymous", &DisabledLookup).is_empty());
    }

    #[test]
    fn test_lookup_called_per_author_in_order() {
        let seen = Mutex::new(Vec::new());
        let lookup = |name: &str| {
            seen.lock().unwrap().push(name.to_string());
            name.starts_with("Ion")
        };
        let authors = split_authors("Ion Popescu1, Maria Ionescu2", &lookup);
        assert!(authors[0].exists);
        assert!(!authors[1].exists);
        assert_eq!(*seen.lock().unwrap(), vec!["Ion Popescu", "Maria Ionescu"]);
    }
}
