//! Table-driven requirement parser shared by every grammar
//!
//! ```text
//!  raw ──▶ trim ──▶ split OR (keep separators) ──▶ split AND (keep separators)
//!      ──▶ merge `op version`, `A - B`, `real as alias` ──▶ clause
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::RequirementError;
use crate::requirement::grammar::{AndSplit, GrammarTable, OrSplit, WildcardPolicy};
use crate::requirement::model::{
    Atom, BoundText, Clause, Cmp, Opaque, OpaqueKind, Operator, OrGroup, Part, Requirement,
};
use crate::requirement::range;
use crate::version::Version;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());
static COMMA_OR_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*|\s+").unwrap());
static BOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([vV])?((?:\d+|[*xX])(?:\.(?:\d+|[*xX]))*)(.*)$").unwrap()
});
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)(\s+-\s+)(\S+)$").unwrap());
static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)(\s+as\s+)(\S+)$").unwrap());
static FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(?:dev|alpha|beta|RC|rc|stable)$").unwrap());
static BRANCH_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[vV]?\d+(?:\.\d+)*\.x-dev$").unwrap());
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][0-9A-Za-z._\-/:#+]*$").unwrap());

/// Byte span inside the text being split
type Span = (usize, usize);

struct Context<'a> {
    raw: &'a str,
    table: &'a GrammarTable,
}

impl Context<'_> {
    fn bad(&self, reason: impl Into<String>) -> RequirementError {
        RequirementError::bad(self.raw, reason)
    }
}

/// Parse `raw` under `table`. Blank input is "any version".
pub fn parse(raw: &str, table: &GrammarTable) -> Result<Requirement, RequirementError> {
    let body = raw.trim();
    if body.is_empty() {
        return Ok(Requirement::any(raw));
    }
    let start = raw.len() - raw.trim_start().len();
    let end = start + body.len();
    let ctx = Context { raw, table };

    let (spans, or_separators) = split_or(body, table);
    let groups = spans
        .iter()
        .map(|&(s, e)| parse_group(&body[s..e], &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Parsed {} requirement '{}' into {} group(s)",
        table.id,
        raw,
        groups.len()
    );
    Ok(Requirement {
        raw: raw.to_string(),
        leading: raw[..start].to_string(),
        trailing: raw[end..].to_string(),
        groups,
        or_separators,
    })
}

/// Split on every match of `re`, returning piece spans and separator texts
fn split_keep(text: &str, re: &Regex) -> (Vec<Span>, Vec<String>) {
    let mut pieces = Vec::new();
    let mut separators = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        pieces.push((last, m.start()));
        separators.push(m.as_str().to_string());
        last = m.end();
    }
    pieces.push((last, text.len()));
    (pieces, separators)
}

fn split_or(body: &str, table: &GrammarTable) -> (Vec<Span>, Vec<String>) {
    match table.or_split {
        OrSplit::None => (vec![(0, body.len())], Vec::new()),
        OrSplit::Pattern(re) => split_keep(body, re),
        OrSplit::CommaUnion => {
            let (pieces, separators) = split_keep(body, &COMMA_RE);
            let mut groups: Vec<Span> = Vec::new();
            let mut or_separators = Vec::new();
            for (i, &(s, e)) in pieces.iter().enumerate() {
                let joins_previous = i > 0
                    && is_comparison(&body[s..e])
                    && is_comparison(&body[pieces[i - 1].0..pieces[i - 1].1]);
                match groups.last_mut() {
                    Some(last) if joins_previous => last.1 = e,
                    _ => {
                        if i > 0 {
                            or_separators.push(separators[i - 1].clone());
                        }
                        groups.push((s, e));
                    }
                }
            }
            (groups, or_separators)
        }
    }
}

fn is_comparison(piece: &str) -> bool {
    piece
        .trim_start()
        .starts_with(['<', '>', '=', '\u{2265}', '\u{2264}'])
}

fn parse_group(text: &str, ctx: &Context<'_>) -> Result<OrGroup, RequirementError> {
    if text.trim().is_empty() {
        return Err(ctx.bad("empty constraint group"));
    }
    let (spans, seps) = match ctx.table.and_split {
        AndSplit::Single => (vec![(0, text.len())], Vec::new()),
        AndSplit::Whitespace => split_keep(text, &WHITESPACE_RE),
        AndSplit::Comma => split_keep(text, &COMMA_RE),
        AndSplit::CommaOrWhitespace => split_keep(text, &COMMA_OR_WHITESPACE_RE),
    };
    let piece = |i: usize| &text[spans[i].0..spans[i].1];
    let blank = |i: usize| seps[i].chars().all(char::is_whitespace);

    let mut clauses = Vec::new();
    let mut separators = Vec::new();
    let mut i = 0;
    while i < spans.len() {
        let n = spans.len();
        let end = if is_operator_token(piece(i), ctx.table) && i + 1 < n && blank(i) {
            i + 1
        } else if i + 2 < n
            && blank(i)
            && blank(i + 1)
            && ((ctx.table.hyphen_ranges && piece(i + 1) == "-")
                || (ctx.table.opaque.aliases && piece(i + 1) == "as"))
        {
            i + 2
        } else {
            i
        };
        if i > 0 {
            separators.push(seps[i - 1].clone());
        }
        clauses.push(parse_clause(&text[spans[i].0..spans[end].1], ctx)?);
        i = end + 1;
    }
    Ok(OrGroup {
        clauses,
        separators,
    })
}

fn is_operator_token(piece: &str, table: &GrammarTable) -> bool {
    table.operators.iter().any(|(symbol, _)| *symbol == piece)
}

fn parse_clause(text: &str, ctx: &Context<'_>) -> Result<Clause, RequirementError> {
    if text.is_empty() {
        return Err(ctx.bad("empty constraint"));
    }
    let table = ctx.table;

    if table.hyphen_ranges {
        if let Some(caps) = HYPHEN_RE.captures(text) {
            return parse_hyphen(&caps[1], &caps[2], &caps[3], ctx);
        }
    }

    if table.opaque.aliases {
        if let Some(caps) = ALIAS_RE.captures(text) {
            let real = caps[1].to_string();
            let numeric = table.parse_version(&real).is_ok();
            return Ok(Clause::Opaque(Opaque {
                text: text.to_string(),
                kind: OpaqueKind::Alias {
                    real,
                    joiner: caps[2].to_string(),
                    alias: caps[3].to_string(),
                    numeric,
                },
            }));
        }
    }

    if let Some(prefix) = table.opaque.branch_prefix {
        if text.starts_with(prefix) {
            let kind = if text.contains('#') {
                OpaqueKind::Commit
            } else {
                OpaqueKind::Branch
            };
            return Ok(opaque(text, kind));
        }
        if BRANCH_ALIAS_RE.is_match(text) {
            return Ok(opaque(text, OpaqueKind::Branch));
        }
    }

    if table.opaque.stability_flags && FLAG_RE.is_match(text) {
        return Ok(opaque(text, OpaqueKind::StabilityFlag));
    }

    match parse_atom(text, ctx) {
        Ok(atom) => Ok(Clause::Atom(atom)),
        Err(_) if table.opaque.tags && TAG_RE.is_match(text) => {
            Ok(opaque(text, OpaqueKind::Tag))
        }
        Err(e) => Err(e),
    }
}

fn opaque(text: &str, kind: OpaqueKind) -> Clause {
    Clause::Opaque(Opaque {
        text: text.to_string(),
        kind,
    })
}

fn parse_hyphen(
    lower: &str,
    joiner: &str,
    upper: &str,
    ctx: &Context<'_>,
) -> Result<Clause, RequirementError> {
    let mut lower = parse_atom(lower, ctx)?;
    let mut upper = parse_atom(upper, ctx)?;
    for atom in [&lower, &upper] {
        if atom.is_explicit() || atom.wildcard_count() > 0 || atom.bound.is_channel() {
            return Err(ctx.bad(format!(
                "hyphen range bounds must be plain versions, found '{}'",
                atom.render()
            )));
        }
    }

    lower.operator = Operator::GreaterOrEqual;
    lower.comparators = range::expand(
        Operator::GreaterOrEqual,
        &given(&lower),
        &lower.bound,
        ctx.table,
    );

    let upper_given = given(&upper);
    let comparator = range::hyphen_upper(&upper_given, &upper.bound, &ctx.table.scheme);
    upper.operator = if comparator.cmp == Cmp::Lte {
        Operator::LessOrEqual
    } else {
        Operator::Less
    };
    upper.comparators = vec![comparator];

    Ok(Clause::Hyphen {
        lower,
        joiner: joiner.to_string(),
        upper,
    })
}

/// Numeric components as written
fn given(atom: &Atom) -> Vec<u64> {
    let n = atom.numeric_precision();
    atom.bound.segments().iter().take(n).copied().collect()
}

fn match_operator(text: &str, table: &GrammarTable) -> Option<(Operator, usize)> {
    table
        .operators
        .iter()
        .filter(|(symbol, _)| text.starts_with(symbol))
        .max_by_key(|(symbol, _)| symbol.len())
        .map(|(symbol, op)| (*op, symbol.len()))
}

fn parse_atom(text: &str, ctx: &Context<'_>) -> Result<Atom, RequirementError> {
    let table = ctx.table;
    let explicit = match_operator(text, table);
    let after_op = &text[explicit.map_or(0, |(_, len)| len)..];
    let rest = after_op.trim_start();
    let op_text = &text[..text.len() - rest.len()];

    if rest.is_empty() {
        return Err(ctx.bad(format!("'{text}' has an operator but no version")));
    }
    if rest.chars().any(char::is_whitespace) {
        return Err(ctx.bad(format!("unexpected whitespace in '{text}'")));
    }

    let (rest, flag) = match rest.find('@') {
        Some(at) if table.opaque.stability_flags => {
            let flag = &rest[at..];
            if !FLAG_RE.is_match(flag) {
                return Err(ctx.bad(format!("unknown stability flag '{flag}'")));
            }
            (&rest[..at], Some(flag.to_string()))
        }
        _ => (rest, None),
    };
    if rest.is_empty() {
        return Err(ctx.bad(format!("'{text}' has no version")));
    }

    let starts_with_digit = rest.starts_with(|c: char| c.is_ascii_digit());
    if table.scheme.channels.is_some() && !starts_with_digit {
        return parse_channel_atom(text, op_text, rest, explicit.is_some(), ctx);
    }

    let caps = BOUND_RE
        .captures(rest)
        .ok_or_else(|| ctx.bad(format!("'{rest}' is not a version")))?;
    let v_prefix = caps.get(1).and_then(|m| m.as_str().chars().next());
    if v_prefix.is_some() && !table.scheme.allow_v_prefix {
        return Err(ctx.bad(format!("'{rest}' may not carry a 'v' prefix")));
    }

    let mut parts = Vec::new();
    for part in caps[2].split('.') {
        match part.chars().next() {
            Some(c) if part.len() == 1 && !c.is_ascii_digit() => {
                if !table.wildcard_chars.contains(&c) {
                    return Err(ctx.bad(format!("wildcard '{c}' is not allowed")));
                }
                parts.push(Part::Wildcard(c));
            }
            _ => parts.push(Part::Number(part.to_string())),
        }
    }
    let tail = caps[3].to_string();

    let numeric = parts.iter().take_while(|p| !p.is_wildcard()).count();
    let has_wildcard = numeric < parts.len();

    let (operator, bound) = if has_wildcard {
        validate_wildcard(text, &parts, numeric, &tail, explicit.is_some(), ctx)?;
        let segments = parts[..numeric]
            .iter()
            .map(|p| p.to_string().parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ctx.bad(format!("'{rest}' is not a version")))?;
        (
            Operator::Wildcard,
            Version::from_segments(&segments, &table.scheme),
        )
    } else {
        let bound = table
            .parse_version(rest)
            .map_err(|e| ctx.bad(e.to_string()))?;
        (
            explicit.map_or(table.bare_operator, |(op, _)| op),
            bound,
        )
    };

    let given: Vec<u64> = bound.segments().iter().take(numeric).copied().collect();
    let comparators = range::expand(operator, &given, &bound, table);
    Ok(Atom {
        operator,
        op_text: op_text.to_string(),
        text: BoundText::Numeric {
            v_prefix,
            parts,
            tail,
        },
        flag,
        bound,
        comparators,
    })
}

fn validate_wildcard(
    text: &str,
    parts: &[Part],
    numeric: usize,
    tail: &str,
    explicit: bool,
    ctx: &Context<'_>,
) -> Result<(), RequirementError> {
    if !parts[numeric..].iter().all(Part::is_wildcard) {
        return Err(ctx.bad(format!("'{text}' has a number after a wildcard")));
    }
    if !tail.is_empty() {
        return Err(ctx.bad(format!("'{text}' has a suffix after a wildcard")));
    }
    if explicit {
        return Err(ctx.bad(format!("'{text}' combines an operator with a wildcard")));
    }
    match ctx.table.wildcards {
        WildcardPolicy::Forbidden => Err(ctx.bad("wildcards are not allowed")),
        WildcardPolicy::BareOnly if numeric > 0 => {
            Err(ctx.bad(format!("'{text}' only a bare '*' is allowed")))
        }
        _ => Ok(()),
    }
}

fn parse_channel_atom(
    text: &str,
    op_text: &str,
    rest: &str,
    explicit: bool,
    ctx: &Context<'_>,
) -> Result<Atom, RequirementError> {
    if explicit {
        return Err(ctx.bad(format!("'{text}' applies an operator to a channel")));
    }
    let bound = ctx
        .table
        .parse_version(rest)
        .map_err(|e| ctx.bad(e.to_string()))?;
    if !bound.is_channel() {
        return Err(ctx.bad(format!("'{rest}' is not a channel")));
    }
    let comparators = range::expand(Operator::Exact, &[], &bound, ctx.table);
    Ok(Atom {
        operator: Operator::Exact,
        op_text: op_text.to_string(),
        text: BoundText::Channel(rest.to_string()),
        flag: None,
        bound,
        comparators,
    })
}
