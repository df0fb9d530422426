use kl_core::prelude::*;

const FUZZY_THRESHOLD: f64 = 0.5;

// A parsed free-text query.  Tokens prefixed "ns:" restrict the namespace (exact match
// against any one of them); everything else must match the object name.  Stateless; the
// UI re-parses on every (keystroke-debounced) input change.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchFilter {
    name_terms: Vec<NameTerm>,
    namespace_terms: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct NameTerm {
    text: String,
    quoted: bool,
}

impl SearchFilter {
    pub fn parse(input: &str) -> SearchFilter {
        let mut filter = SearchFilter::default();
        for token in input.split_whitespace() {
            if let Some(ns) = token.strip_prefix("ns:") {
                let (text, _) = strip_quotes(ns);
                if !text.is_empty() {
                    filter.namespace_terms.push(text.into());
                }
            } else {
                let (text, quoted) = strip_quotes(token);
                if !text.is_empty() {
                    filter.name_terms.push(NameTerm { text: text.into(), quoted });
                }
            }
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.name_terms.is_empty() && self.namespace_terms.is_empty()
    }

    pub fn matches(&self, obj: &KubeObject) -> bool {
        self.matches_name(&obj.name(), obj.namespace().as_deref())
    }

    pub fn matches_name(&self, name: &str, namespace: Option<&str>) -> bool {
        if !self.namespace_terms.is_empty() {
            let Some(ns) = namespace else { return false };
            if !self.namespace_terms.iter().any(|t| t == ns) {
                return false;
            }
        }

        self.name_terms.iter().all(|t| t.accepts(name))
    }
}

impl NameTerm {
    // Substring match first; unquoted terms additionally get a fuzzy pass, since nobody
    // remembers the hash suffixes in generated names.  Quoting a term opts out of fuzz.
    fn accepts(&self, name: &str) -> bool {
        if name.contains(&self.text) {
            return true;
        }
        !self.quoted && fuzzy_match(&self.text, name)
    }
}

// Kubernetes names are hyphen-segmented (deployment-7f9c8d6b5-x2kpl); accept if any
// term segment is similar enough to any name segment.
fn fuzzy_match(term: &str, name: &str) -> bool {
    term.split('-')
        .any(|t| name.split('-').any(|seg| hamming_similarity(t, seg) > FUZZY_THRESHOLD))
}

// Fraction of positions holding the same character, over the longer of the two lengths
fn hamming_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }

    let matched = a.chars().zip(b.chars()).filter(|(ca, cb)| ca == cb).count();
    matched as f64 / longest as f64
}

fn strip_quotes(token: &str) -> (&str, bool) {
    match token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) => (inner, true),
        None => (token, false),
    }
}
