//! Boolean expressions for sentry if-parts.

use crate::naming;
use crate::routing::Predicate;

/// Quotes `value` as a single-quoted expression literal.
fn literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Renders one predicate as `{slug}_outcome == 'value'`.
pub fn render_predicate(predicate: &Predicate) -> String {
    format!(
        "{} {} {}",
        naming::outcome_variable(&predicate.source),
        predicate.comparison.symbol(),
        literal(&predicate.outcome)
    )
}

/// Joins `predicates` left to right with their declared connectors and wraps the
/// result as `${...}`.
///
/// The connector of the first predicate is ignored. No predicates yields an empty
/// string, which the emitter treats as an unconditional trigger.
pub fn synthesize(predicates: &[Predicate]) -> String {
    let Some((first, rest)) = predicates.split_first() else {
        return String::new();
    };

    let mut body = render_predicate(first);
    for predicate in rest {
        body.push_str(&format!(
            " {} {}",
            predicate.connector.symbol(),
            render_predicate(predicate)
        ));
    }
    format!("${{{}}}", body)
}
