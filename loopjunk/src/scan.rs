//! Everything that pattern-matches the program text: variable
//! classification, loop-body extraction and statement classification.
//!
//! The target grammar is a narrow C-like subset: declarations are
//! `int x;` or `int x = <expr>;`, loops are `while ( <cond> ) { <body> }`
//! without nesting, statements end in `;`. Text outside these shapes is
//! left alone by the passes, never rejected.

use std::{collections::BTreeSet, ops::Range};

use itertools::Itertools as _;
use lazy_static::lazy_static;
use regex::Regex;

use crate::Symbol;

lazy_static! {
    /// `int x;` or `int x = <expr>;`
    static ref DECLARATION: Regex =
        Regex::new(r"\bint\s+(\w+)(?:\s*=\s*[^;]*)?;").unwrap();

    /// `while ( <cond> ) { <body> }`, shortest body, across lines.
    static ref WHILE_LOOP: Regex =
        Regex::new(r"(?s)while\s*\((.*?)\)\s*\{(.*?)\}").unwrap();
}

/// The declared variables of one source text, split by naming convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarClasses {
    /// Variables carrying the program's actual state.
    pub real: Vec<Symbol>,

    /// Variables that exist only to absorb obfuscating arithmetic.
    pub junk: Vec<Symbol>,
}

/// Scans the declarations of `code` and classifies every declared name:
/// names starting with `junk_prefix` are junk, everything else is real.
///
/// Duplicate declarations collapse, and classifying the same text again
/// gives the same classes.
pub fn classify_variables(code: &str, junk_prefix: char) -> VarClasses {
    let mut real = BTreeSet::new();
    let mut junk = BTreeSet::new();
    for cap in DECLARATION.captures_iter(code) {
        let name = cap.get(1).unwrap().as_str();
        if name.starts_with(junk_prefix) {
            junk.insert(Symbol::from(name));
        } else {
            real.insert(Symbol::from(name));
        }
    }

    VarClasses {
        real: real.into_iter().collect(),
        junk: junk.into_iter().collect(),
    }
}

/// One `while` loop found in the text.
///
/// `body_span` indexes into the original text, so a rewritten body can be
/// spliced back positionally even when two bodies are textually
/// identical.
#[derive(Clone, Debug)]
pub struct LoopBody<'a> {
    pub condition: &'a str,
    pub body: &'a str,
    pub body_span: Range<usize>,
}

/// Extracts every `while` body, in order of appearance.
///
/// Matching is not nesting-aware: a body ends at the first `}`. Inputs
/// outside the supported grammar simply yield fewer (or zero) loops.
pub fn loop_bodies(code: &str) -> Vec<LoopBody<'_>> {
    WHILE_LOOP
        .captures_iter(code)
        .map(|cap| {
            let body = cap.get(2).unwrap();
            LoopBody {
                condition: cap.get(1).unwrap().as_str(),
                body: body.as_str(),
                body_span: body.range(),
            }
        })
        .collect()
}

/// Line tests built once per transformation pass from the classified
/// variables.
#[derive(Debug)]
pub struct StatementClassifier {
    /// Word-bounded match of any real variable, or `None` when there are
    /// no real variables and nothing can match.
    real_reference: Option<Regex>,

    /// An assignment line whose target is one of the junk variables.
    junk_assignment: Option<Regex>,
}

impl StatementClassifier {
    pub fn new(vars: &VarClasses) -> Self {
        Self {
            real_reference: alternation(&vars.real)
                .map(|alt| Regex::new(&format!(r"\b(?:{alt})\b")).unwrap()),
            junk_assignment: alternation(&vars.junk)
                .map(|alt| Regex::new(&format!(r"^\s*(?:{alt})\s*=")).unwrap()),
        }
    }

    /// Does this line mention a real variable at all?
    pub fn references_real(&self, line: &str) -> bool {
        self.real_reference.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Is this line an assignment to a junk variable?
    pub fn is_junk_assignment(&self, line: &str) -> bool {
        self.junk_assignment.as_ref().is_some_and(|re| re.is_match(line))
    }
}

/// `a|b|c` with every name escaped, or `None` for an empty set.
fn alternation(vars: &[Symbol]) -> Option<String> {
    if vars.is_empty() {
        return None;
    }

    Some(vars.iter().map(|v| regex::escape(v.as_str())).join("|"))
}

#[cfg(test)]
mod test {
    use itertools::Itertools as _;

    use super::*;

    const CODE: &str = "\
int x = 10;
int y;
int g1;
int g2 = 0;
while (x > 0) {
    x = x - y;
    g1 = g1 + 1;
}
while (y > 0) {
    y = y - 1;
}
";

    #[test]
    fn classification() {
        let vars = classify_variables(CODE, 'g');
        let names = |v: &[Symbol]| {
            v.iter().map(|s| s.as_str().to_owned()).sorted().collect::<Vec<_>>()
        };
        assert_eq!(names(&vars.real), ["x", "y"]);
        assert_eq!(names(&vars.junk), ["g1", "g2"]);
    }

    #[test]
    fn classification_is_idempotent() {
        let first = classify_variables(CODE, 'g');
        for _ in 0..5 {
            assert_eq!(classify_variables(CODE, 'g'), first);
        }
    }

    #[test]
    fn finds_loop_bodies_with_spans() {
        let loops = loop_bodies(CODE);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].condition, "x > 0");
        assert_eq!(loops[1].condition, "y > 0");
        for lb in &loops {
            assert_eq!(&CODE[lb.body_span.clone()], lb.body);
        }
    }

    #[test]
    fn identical_bodies_get_distinct_spans() {
        let code = "while (a) { a = a - 1; }\nwhile (a) { a = a - 1; }\n";
        let loops = loop_bodies(code);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].body, loops[1].body);
        assert_ne!(loops[0].body_span, loops[1].body_span);
    }

    #[test]
    fn statement_classifier() {
        let vars = classify_variables(CODE, 'g');
        let c = StatementClassifier::new(&vars);

        assert!(c.references_real("    x = x - y;"));
        assert!(c.references_real("    g1 = g1 + x;"));
        assert!(!c.references_real("    g1 = g1 + 1;"));
        // `x` must match as a word, not as a substring.
        assert!(!c.references_real("    xx = xx + 1;"));

        assert!(c.is_junk_assignment("    g1 = g1 + 1;"));
        assert!(c.is_junk_assignment("g2 = 0;"));
        assert!(!c.is_junk_assignment("    x = g1;"));
    }

    #[test]
    fn empty_classes_match_nothing() {
        let c = StatementClassifier::new(&VarClasses {
            real: Vec::new(),
            junk: Vec::new(),
        });
        assert!(!c.references_real("x = 1;"));
        assert!(!c.is_junk_assignment("g1 = 1;"));
    }
}
