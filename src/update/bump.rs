//! `BumpVersions` in replace mode

use tracing::debug;

use crate::requirement::grammar::GrammarTable;
use crate::requirement::model::{Atom, Clause, OrGroup, Operator, Requirement};
use crate::update::{truncated_target, upper};
use crate::version::Version;

/// Rewrite the numeric groups of `requirement` to track `target`.
/// Opaque groups are kept after the numeric part. `None` means no rewrite
/// in the original style exists.
pub fn bump(requirement: &Requirement, target: &Version, table: &GrammarTable) -> Option<String> {
    let (numeric, opaque): (Vec<&OrGroup>, Vec<&OrGroup>) = requirement
        .groups()
        .iter()
        .partition(|group| !group.is_opaque());

    let numeric_text = match numeric.as_slice() {
        [] => return None,
        [group] => bump_group(group, target, table)?,
        groups => match groups.iter().find(|group| group.satisfied_by(target)) {
            Some(group) => {
                debug!("Keeping group '{}' which admits {}", group.render(), target);
                group.render()
            }
            None => collapse(target, table),
        },
    };

    let separator = or_separator(requirement, table);
    let mut out = format!("{}{}", requirement.leading(), numeric_text);
    for group in opaque {
        out.push_str(&separator);
        out.push_str(&group.render());
    }
    out.push_str(requirement.trailing());
    Some(out)
}

/// First OR separator of the original, else the grammar default
pub(crate) fn or_separator(requirement: &Requirement, table: &GrammarTable) -> String {
    requirement
        .or_separators()
        .first()
        .cloned()
        .or_else(|| table.update.default_or_separator.map(str::to_string))
        .unwrap_or_else(|| " || ".to_string())
}

/// Single bound around the target using the grammar's collapse operator
pub(crate) fn collapse(target: &Version, table: &GrammarTable) -> String {
    format!("{}{}", table.update.collapse_operator, target.raw())
}

fn bump_group(group: &OrGroup, target: &Version, table: &GrammarTable) -> Option<String> {
    match group.clauses() {
        [Clause::Atom(atom)] => bump_atom(atom, target, table),
        [Clause::Hyphen {
            lower,
            joiner,
            upper,
        }] => Some(format!(
            "{}{}{}",
            lower.render(),
            joiner,
            upper::raise_atom(upper, target)
        )),
        [Clause::Opaque(opaque)] => Some(opaque.text().to_string()),
        _ => Some(collapse(target, table)),
    }
}

fn bump_atom(atom: &Atom, target: &Version, table: &GrammarTable) -> Option<String> {
    if atom.bound().is_channel() || target.is_channel() {
        return match (atom.bound().channel(), target.channel()) {
            (Some(old), Some(new)) if old.name() == new.name() => {
                Some(atom.with_bound_text(target.raw()))
            }
            _ => {
                debug!(
                    "Cannot move '{}' to {} without changing channel",
                    atom.render(),
                    target
                );
                None
            }
        };
    }

    let text = match atom.operator() {
        Operator::Less | Operator::LessOrEqual => upper::raise_atom(atom, target),
        Operator::Greater => atom.render(),
        Operator::Caret | Operator::Tilde | Operator::Wildcard => {
            atom.with_bound_text(&truncated_target(atom, target))
        }
        Operator::Exact
            if table.partial_exact_is_prefix && atom.comparators().len() > 1 =>
        {
            atom.with_bound_text(&truncated_target(atom, target))
        }
        Operator::Exact | Operator::GreaterOrEqual => atom.with_bound_text(target.unprefixed()),
    };
    Some(text)
}
