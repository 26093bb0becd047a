//! Parsed requirement: OR-groups of AND-combined clauses, with enough layout
//! kept to re-render the original text byte for byte

use std::fmt;

use crate::version::Version;

/// Operator of a single bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=1.2.3` (or a bare version in exact-match grammars)
    Exact,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// `~1.2.3`
    Tilde,
    /// `^1.2.3` (or a bare version in implicit-caret grammars)
    Caret,
    /// `1.2.*`, `1.x`, `*`
    Wildcard,
}

impl Operator {
    /// Returns true for `<` and `<=`
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Operator::Less | Operator::LessOrEqual)
    }
}

/// Primitive comparison used by expanded bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cmp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Cmp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Gt => ">",
            Cmp::Gte => ">=",
            Cmp::Lt => "<",
            Cmp::Lte => "<=",
        }
    }
}

/// One expanded bound, e.g. `>=1.4.0`
#[derive(Debug, Clone)]
pub struct Comparator {
    pub cmp: Cmp,
    pub version: Version,
}

impl Comparator {
    pub fn new(cmp: Cmp, version: Version) -> Self {
        Self { cmp, version }
    }

    /// Incomparable versions never match
    pub fn matches(&self, version: &Version) -> bool {
        let Some(ordering) = version.compare(&self.version) else {
            return false;
        };
        match self.cmp {
            Cmp::Eq => ordering.is_eq(),
            Cmp::Gt => ordering.is_gt(),
            Cmp::Gte => ordering.is_ge(),
            Cmp::Lt => ordering.is_lt(),
            Cmp::Lte => ordering.is_le(),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.cmp.symbol(), self.version.unprefixed())
    }
}

/// One dot-separated component of a bound as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Number(String),
    Wildcard(char),
}

impl Part {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Part::Wildcard(_))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Number(n) => f.write_str(n),
            Part::Wildcard(c) => write!(f, "{c}"),
        }
    }
}

/// Text of a bound as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundText {
    /// `v` prefix, components, and the prerelease/build tail (`-rc1`, `beta`)
    Numeric {
        v_prefix: Option<char>,
        parts: Vec<Part>,
        tail: String,
    },
    /// A channel name such as `nightly-2023-12-25`
    Channel(String),
}

/// A single `{operator, bound}` with its layout
#[derive(Debug, Clone)]
pub struct Atom {
    pub(crate) operator: Operator,
    /// Operator exactly as written including trailing spaces, empty when implied
    pub(crate) op_text: String,
    pub(crate) text: BoundText,
    /// Composer stability flag such as `@dev`
    pub(crate) flag: Option<String>,
    pub(crate) bound: Version,
    pub(crate) comparators: Vec<Comparator>,
}

impl Atom {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn op_text(&self) -> &str {
        &self.op_text
    }

    /// Whether the operator is written out rather than implied
    pub fn is_explicit(&self) -> bool {
        !self.op_text.is_empty()
    }

    pub fn bound(&self) -> &Version {
        &self.bound
    }

    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref()
    }

    pub fn v_prefix(&self) -> Option<char> {
        match &self.text {
            BoundText::Numeric { v_prefix, .. } => *v_prefix,
            BoundText::Channel(_) => None,
        }
    }

    pub fn parts(&self) -> &[Part] {
        match &self.text {
            BoundText::Numeric { parts, .. } => parts,
            BoundText::Channel(_) => &[],
        }
    }

    /// Number of components as written, wildcards included
    pub fn precision(&self) -> usize {
        self.parts().len()
    }

    /// Number of leading numeric components
    pub fn numeric_precision(&self) -> usize {
        self.parts().iter().take_while(|p| !p.is_wildcard()).count()
    }

    pub fn wildcard_count(&self) -> usize {
        self.parts().iter().filter(|p| p.is_wildcard()).count()
    }

    /// Expanded bounds; empty means unconstrained
    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }

    /// Render with a new bound text, keeping operator, `v` prefix and flag
    pub fn with_bound_text(&self, bound: &str) -> String {
        let mut out = self.op_text.clone();
        if let Some(v) = self.v_prefix() {
            out.push(v);
        }
        out.push_str(bound);
        if let Some(flag) = &self.flag {
            out.push_str(flag);
        }
        out
    }

    pub fn render(&self) -> String {
        let mut out = self.op_text.clone();
        match &self.text {
            BoundText::Numeric {
                v_prefix,
                parts,
                tail,
            } => {
                if let Some(v) = v_prefix {
                    out.push(*v);
                }
                let parts: Vec<String> = parts.iter().map(Part::to_string).collect();
                out.push_str(&parts.join("."));
                out.push_str(tail);
            }
            BoundText::Channel(name) => out.push_str(name),
        }
        if let Some(flag) = &self.flag {
            out.push_str(flag);
        }
        out
    }
}

/// Kind of a non-numeric requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpaqueKind {
    /// `dev-master`, `1.x-dev`
    Branch,
    /// `dev-master#c87d856`
    Commit,
    /// `mybranch as 1.2.x`, `1.2.0 as 1.0.0`
    Alias {
        real: String,
        joiner: String,
        alias: String,
        numeric: bool,
    },
    /// A bare stability flag such as `@stable`
    StabilityFlag,
    /// A dist-tag or other word (`latest`)
    Tag,
}

/// A constraint compared only by literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub(crate) text: String,
    pub(crate) kind: OpaqueKind,
}

impl Opaque {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &OpaqueKind {
        &self.kind
    }

    /// Literal equality. A numeric alias also matches its real side.
    pub fn satisfied_by(&self, version: &Version) -> bool {
        match &self.kind {
            OpaqueKind::Alias {
                real,
                numeric: true,
                ..
            } => version.raw() == real || version.raw() == self.text,
            _ => version.raw() == self.text,
        }
    }
}

/// One AND-combined member of an OR-group
#[derive(Debug, Clone)]
pub enum Clause {
    Atom(Atom),
    /// `A - B`, stored as `>=A` and an upper bound on `B`
    Hyphen {
        lower: Atom,
        joiner: String,
        upper: Atom,
    },
    Opaque(Opaque),
}

impl Clause {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Clause::Opaque(_))
    }

    pub fn satisfied_by(&self, version: &Version) -> bool {
        match self {
            Clause::Atom(atom) => atom.satisfied_by(version),
            Clause::Hyphen { lower, upper, .. } => {
                lower.satisfied_by(version) && upper.satisfied_by(version)
            }
            Clause::Opaque(opaque) => opaque.satisfied_by(version),
        }
    }

    /// Atoms contained in this clause
    pub fn atoms(&self) -> Vec<&Atom> {
        match self {
            Clause::Atom(atom) => vec![atom],
            Clause::Hyphen { lower, upper, .. } => vec![lower, upper],
            Clause::Opaque(_) => vec![],
        }
    }

    pub fn render(&self) -> String {
        match self {
            Clause::Atom(atom) => atom.render(),
            Clause::Hyphen {
                lower,
                joiner,
                upper,
            } => format!("{}{}{}", lower.render(), joiner, upper.render()),
            Clause::Opaque(opaque) => opaque.text.clone(),
        }
    }

    fn canonical(&self) -> Vec<String> {
        match self {
            Clause::Opaque(opaque) => vec![opaque.text.clone()],
            _ => self
                .atoms()
                .into_iter()
                .flat_map(|a| a.comparators.iter().map(Comparator::to_string))
                .collect(),
        }
    }
}

/// AND-combined clauses with the separators found between them
#[derive(Debug, Clone)]
pub struct OrGroup {
    pub(crate) clauses: Vec<Clause>,
    pub(crate) separators: Vec<String>,
}

impl OrGroup {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Separator text between clause `i` and `i + 1`
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// A group made only of branches, commits, aliases or tags
    pub fn is_opaque(&self) -> bool {
        self.clauses.iter().all(Clause::is_opaque)
    }

    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.clauses.iter().all(|c| c.satisfied_by(version))
    }

    pub fn atoms(&self) -> Vec<&Atom> {
        self.clauses.iter().flat_map(Clause::atoms).collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separators[i - 1]);
            }
            out.push_str(&clause.render());
        }
        out
    }

    fn canonical(&self) -> String {
        let bounds: Vec<String> = self.clauses.iter().flat_map(Clause::canonical).collect();
        if bounds.is_empty() {
            "*".to_string()
        } else {
            bounds.join(", ")
        }
    }
}

/// A parsed requirement string
#[derive(Debug, Clone)]
pub struct Requirement {
    pub(crate) raw: String,
    pub(crate) leading: String,
    pub(crate) trailing: String,
    pub(crate) groups: Vec<OrGroup>,
    pub(crate) or_separators: Vec<String>,
}

impl Requirement {
    /// A requirement with no groups, satisfied by every version
    pub fn any(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            leading: String::new(),
            trailing: String::new(),
            groups: Vec::new(),
            or_separators: Vec::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_any(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[OrGroup] {
        &self.groups
    }

    pub fn or_separators(&self) -> &[String] {
        &self.or_separators
    }

    /// Whitespace before the first group
    pub fn leading(&self) -> &str {
        &self.leading
    }

    /// Whitespace after the last group
    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// Every atom of every group, in textual order
    pub fn atoms(&self) -> Vec<&Atom> {
        self.groups.iter().flat_map(OrGroup::atoms).collect()
    }

    pub fn render(&self) -> String {
        if self.is_any() {
            return self.raw.clone();
        }
        format!("{}{}{}", self.leading, self.render_body(), self.trailing)
    }

    /// Groups and separators without surrounding whitespace
    pub fn render_body(&self) -> String {
        let mut out = String::new();
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.or_separators[i - 1]);
            }
            out.push_str(&group.render());
        }
        out
    }

    /// Expanded form, e.g. `1.4.*` renders as `>=1.4.0, <1.5.0`
    pub fn canonical(&self) -> String {
        if self.is_any() {
            return "*".to_string();
        }
        self.groups
            .iter()
            .map(OrGroup::canonical)
            .collect::<Vec<_>>()
            .join(" || ")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
