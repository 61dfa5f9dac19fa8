//! The write and read transformations over loop bodies.
//!
//! Both passes classify the declared variables once, walk every `while`
//! body line by line, and splice the rewritten bodies back into the
//! surrounding text by position. Neither pass performs I/O or mutates its
//! input; inputs the scanner cannot work with come back unchanged.

use itertools::Itertools as _;
use rand::{Rng, seq::SliceRandom as _};

use crate::{
    Symbol,
    identity::{self, IdentityConfig, PolynomialIdentity},
    scan::{StatementClassifier, classify_variables, loop_bodies},
};

/// Settings for both obfuscation passes.
/// Use `ObfuscationConfig::default()` to get a reasonable default.
#[derive(Clone, Debug)]
pub struct ObfuscationConfig {
    /// Leading character that marks a declared variable as junk.
    ///
    /// The default is 'g'.
    pub junk_prefix: char,

    /// Settings for the identities the write pass embeds.
    pub identity: IdentityConfig,
}

impl Default for ObfuscationConfig {
    /// Returns a reasonable default configuration.
    fn default() -> Self {
        Self { junk_prefix: 'g', identity: IdentityConfig::default() }
    }
}

/// Rewrites every statement in a `while` body that references a real
/// variable by wrapping both sides of its `=` in the two sides of a fresh
/// polynomial identity over the junk variables:
///
/// ```text
/// x = x - 1;
/// (x + <identity lhs>) = x - 1 + (<identity rhs>);
/// ```
///
/// Since the identity's sides are equal for every value of the junk
/// variables, the statement's effect on real state is unchanged. Lines
/// without a real variable, lines that are not assignment statements, and
/// everything outside loop bodies are copied byte-identically.
///
/// Texts with fewer than two declared junk variables come back unchanged:
/// there is nothing to build identities from.
pub fn obfuscate_writes<Rand: Rng>(
    code: &str,
    cfg: &ObfuscationConfig,
    rng: &mut Rand,
) -> String {
    let vars = classify_variables(code, cfg.junk_prefix);
    if vars.junk.len() < 2 {
        tracing::debug!("fewer than two junk variables, nothing to embed");
        return code.to_owned();
    }

    let classifier = StatementClassifier::new(&vars);
    rewrite_bodies(code, |body| {
        rewrite_lines(body, |line| {
            if !classifier.references_real(line) {
                return None;
            }

            let id = identity::generate(&vars.junk, &cfg.identity, rng);
            embed_identity(line, &id)
        })
    })
}

/// Appends a random combination of real variables to every junk
/// assignment inside a `while` body:
///
/// ```text
/// g1 = g1 + 1;
/// g1 = g1 + 1 + x - y;
/// ```
///
/// Junk variables carry no meaning, so the program's observable behavior
/// is unchanged while the junk updates become data-dependent on real
/// state. All other lines are copied byte-identically. Texts without real
/// variables come back unchanged.
pub fn obfuscate_reads<Rand: Rng>(
    code: &str,
    cfg: &ObfuscationConfig,
    rng: &mut Rand,
) -> String {
    let vars = classify_variables(code, cfg.junk_prefix);
    if vars.real.is_empty() {
        tracing::debug!("no real variables, nothing to couple junk to");
        return code.to_owned();
    }

    let classifier = StatementClassifier::new(&vars);
    rewrite_bodies(code, |body| {
        rewrite_lines(body, |line| {
            if !classifier.is_junk_assignment(line) || !line.contains(';') {
                return None;
            }

            let expr = random_read_expression(&vars.real, rng);
            Some(line.replacen(';', &format!(" + {expr};"), 1))
        })
    })
}

/// Replaces every loop body of `code` with `rewrite(body)`.
///
/// Bodies are spliced by their spans in the original text, so two
/// textually identical bodies cannot shadow each other.
fn rewrite_bodies(
    code: &str,
    mut rewrite: impl FnMut(&str) -> String,
) -> String {
    let mut out = String::with_capacity(code.len());
    let mut copied_to = 0;
    for lb in loop_bodies(code) {
        out.push_str(&code[copied_to..lb.body_span.start]);
        out.push_str(&rewrite(lb.body));
        copied_to = lb.body_span.end;
    }

    out.push_str(&code[copied_to..]);
    out
}

/// Maps the lines of a body through `rewrite`; `None` keeps a line as is.
/// Splitting on '\n' round-trips exactly, so untouched lines (and the
/// body's leading/trailing newlines) stay byte-identical.
fn rewrite_lines(
    body: &str,
    mut rewrite: impl FnMut(&str) -> Option<String>,
) -> String {
    body.split('\n')
        .map(|line| rewrite(line).unwrap_or_else(|| line.to_owned()))
        .join("\n")
}

/// Splices an identity into an assignment statement: the target side is
/// wrapped as `(<target> + <identity lhs>)`, the value side gets
/// ` + (<identity rhs>)` before its first `;`. Only the first `=` and the
/// first `;` count; a line missing either (or with `;` before `=`) is not
/// an assignment statement and comes back as `None`.
fn embed_identity(line: &str, id: &PolynomialIdentity) -> Option<String> {
    let (Some(eq), Some(semi)) = (line.find('='), line.find(';')) else {
        return None;
    };
    if semi < eq {
        return None;
    }

    let indent = &line[..line.len() - line.trim_start().len()];
    let target = line[indent.len()..eq].trim_end();
    let value = &line[eq + 1..semi];
    let tail = &line[semi + 1..];

    Some(format!(
        "{indent}({target} + {lhs}) ={value} + ({rhs});{tail}",
        lhs = id.lhs,
        rhs = id.rhs,
    ))
}

/// A single real variable, or `a + b` / `a - b` over two distinct real
/// variables. Mirrors drawing a random-length prefix of the shuffled real
/// variables and using at most the first two of it.
fn random_read_expression<Rand: Rng>(
    real: &[Symbol],
    rng: &mut Rand,
) -> String {
    let mut pool = real.to_vec();
    pool.shuffle(rng);

    let keep = rng.random_range(1..=pool.len());
    if keep == 1 {
        pool[0].to_string()
    } else {
        let op = if rng.random() { '+' } else { '-' };
        format!("{} {op} {}", pool[0], pool[1])
    }
}
