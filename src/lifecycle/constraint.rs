//! Cycle constraint matching
//!
//! A lifecycle `cycle` is read as a version constraint:
//! - `7.4` - partial version, wildcard over the missing parts (>=7.4.0 <7.5.0)
//! - `18` - major only (>=18.0.0 <19.0.0)
//! - `1.2.3` / `=1.2.3` - exact match
//! - `^1.2.3`, `~1.2.3`, `>=1.2`, `>1.2`, `<=1.2`, `<1.2`, `!=1.2` - operators
//! - `1.2.x`, `1.x`, `*` - wildcards
//! - `1.0 - 2.0` - hyphen range (inclusive)
//! - `>=1.0, <2.0` or `>=1.0 <2.0` - AND, `^1 || ^2` - OR
//!
//! Pre-release versions only satisfy constraints that mention a pre-release themselves.

use semver::{BuildMetadata, Version};

use crate::lifecycle::semver::{Precision, parse_partial};

/// Parsed form of a cycle identifier
#[derive(Debug, Clone)]
pub struct CycleConstraint {
    /// OR of AND groups
    alternatives: Vec<Vec<Comparator>>,
    allows_prerelease: bool,
}

impl CycleConstraint {
    /// Parse a cycle string; `None` when any part of it is not a valid constraint
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let alternatives = input
            .split("||")
            .map(parse_and_group)
            .collect::<Option<Vec<_>>>()?;

        let allows_prerelease = alternatives
            .iter()
            .flatten()
            .any(Comparator::mentions_prerelease);

        Some(Self {
            alternatives,
            allows_prerelease,
        })
    }

    /// Check whether `version` falls inside this constraint
    pub fn contains(&self, version: &Version) -> bool {
        if !version.pre.is_empty() && !self.allows_prerelease {
            return false;
        }

        let version = without_build(version);
        self.alternatives
            .iter()
            .any(|group| group.iter().all(|c| c.satisfies(&version)))
    }
}

/// Parse a space or comma separated list of comparators (all must hold)
fn parse_and_group(group: &str) -> Option<Vec<Comparator>> {
    let normalized = group.replace(',', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let mut comparators = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];

        // Hyphen range: "<from> - <to>"
        if i + 2 < tokens.len() && tokens[i + 1] == "-" {
            comparators.push(Comparator::parse_hyphen(token, tokens[i + 2])?);
            i += 3;
            continue;
        }

        // Operator separated from its operand: ">= 1.2"
        if is_operator(token) {
            let operand = tokens.get(i + 1)?;
            comparators.push(Comparator::parse(&format!("{token}{operand}"))?);
            i += 2;
            continue;
        }

        comparators.push(Comparator::parse(token)?);
        i += 1;
    }

    Some(comparators)
}

fn is_operator(token: &str) -> bool {
    matches!(
        token,
        "=" | "!=" | ">" | ">=" | "<" | "<=" | "=<" | "~" | "~>" | "^"
    )
}

fn without_build(version: &Version) -> Version {
    Version {
        build: BuildMetadata::EMPTY,
        ..version.clone()
    }
}

/// Version operand, possibly a wildcard
#[derive(Debug, Clone)]
enum Operand {
    Any,
    Version(Version, Precision),
}

impl Operand {
    /// Parse "1.2.3", "1.2", "1.2.x", "1.x", "*"
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if is_wildcard(text) {
            return Some(Operand::Any);
        }

        // Drop wildcard components: "1.2.x" -> "1.2"
        let parts: Vec<&str> = text.split('.').collect();
        let concrete: Vec<&str> = parts
            .iter()
            .copied()
            .take_while(|part| !is_wildcard(part))
            .collect();
        if concrete.len() < parts.len() && parts[concrete.len()..].iter().any(|p| !is_wildcard(p))
        {
            // "1.x.3" is not a valid wildcard
            return None;
        }

        let (version, precision) = parse_partial(&concrete.join("."))?;
        Some(Operand::Version(without_build(&version), precision))
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

/// A single comparator inside an AND group
#[derive(Debug, Clone)]
enum Comparator {
    /// Any version: `*`
    Any,
    /// Bare or `=` version, wildcard over missing components
    Equal(Version, Precision),
    /// `!=`
    NotEqual(Version, Precision),
    /// `>`; a partial operand excludes its whole wildcard range
    Gt(Version, Precision),
    /// `>=`
    Gte(Version),
    /// `<`
    Lt(Version),
    /// `<=`; a partial operand includes its whole wildcard range
    Lte(Version, Precision),
    /// `~1.2.3` means >=1.2.3 <1.3.0, `~1` means >=1.0.0 <2.0.0
    Tilde(Version, Precision),
    /// `^1.2.3` means >=1.2.3 <2.0.0 (narrower for 0.x)
    Caret(Version, Precision),
    /// `1.0 - 2.0` means >=1.0.0 and <=2.0.*
    Hyphen {
        from: Version,
        to: Version,
        to_precision: Precision,
    },
}

impl Comparator {
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        let (op, rest) = [">=", "<=", "=<", "!=", "~>", ">", "<", "=", "~", "^"]
            .iter()
            .find_map(|op| input.strip_prefix(op).map(|rest| (*op, rest)))
            .unwrap_or(("", input));

        let operand = Operand::parse(rest)?;
        let Operand::Version(v, p) = operand else {
            // Wildcard operands: "*", ">=*", "~x" all accept everything except "<*" / "!=*"
            return match op {
                "<" | "!=" => None,
                _ => Some(Comparator::Any),
            };
        };

        let comparator = match op {
            "" | "=" => Comparator::Equal(v, p),
            "!=" => Comparator::NotEqual(v, p),
            ">" => Comparator::Gt(v, p),
            ">=" => Comparator::Gte(v),
            "<" => Comparator::Lt(v),
            "<=" | "=<" => Comparator::Lte(v, p),
            "~" | "~>" => Comparator::Tilde(v, p),
            "^" => Comparator::Caret(v, p),
            _ => return None,
        };
        Some(comparator)
    }

    fn parse_hyphen(from: &str, to: &str) -> Option<Self> {
        let from = match Operand::parse(from)? {
            Operand::Version(v, _) => v,
            Operand::Any => Version::new(0, 0, 0),
        };
        match Operand::parse(to)? {
            Operand::Version(to, to_precision) => Some(Comparator::Hyphen {
                from,
                to,
                to_precision,
            }),
            Operand::Any => Some(Comparator::Gte(from)),
        }
    }

    fn mentions_prerelease(&self) -> bool {
        match self {
            Comparator::Any => false,
            Comparator::Equal(v, _)
            | Comparator::NotEqual(v, _)
            | Comparator::Gt(v, _)
            | Comparator::Gte(v)
            | Comparator::Lt(v)
            | Comparator::Lte(v, _)
            | Comparator::Tilde(v, _)
            | Comparator::Caret(v, _) => !v.pre.is_empty(),
            Comparator::Hyphen { from, to, .. } => !from.pre.is_empty() || !to.pre.is_empty(),
        }
    }

    fn satisfies(&self, version: &Version) -> bool {
        match self {
            Comparator::Any => true,
            Comparator::Equal(v, p) => within_wildcard(version, v, *p),
            Comparator::NotEqual(v, p) => !within_wildcard(version, v, *p),
            Comparator::Gt(v, Precision::Patch) => version > v,
            Comparator::Gt(v, p) => wildcard_upper(v, *p).is_some_and(|upper| *version >= upper),
            Comparator::Gte(v) => version >= v,
            Comparator::Lt(v) => version < v,
            Comparator::Lte(v, Precision::Patch) => version <= v,
            Comparator::Lte(v, p) => below(version, wildcard_upper(v, *p)),
            Comparator::Tilde(v, p) => {
                let upper = match p {
                    Precision::Major => wildcard_upper(v, Precision::Major),
                    Precision::Minor | Precision::Patch => wildcard_upper(v, Precision::Minor),
                };
                version >= v && below(version, upper)
            }
            Comparator::Caret(v, p) => version >= v && below(version, caret_upper(v, *p)),
            Comparator::Hyphen {
                from,
                to,
                to_precision,
            } => {
                version >= from
                    && match to_precision {
                        Precision::Patch => version <= to,
                        p => below(version, wildcard_upper(to, *p)),
                    }
            }
        }
    }
}

/// Does `version` fall inside the wildcard range spanned by a partial version
fn within_wildcard(version: &Version, base: &Version, precision: Precision) -> bool {
    match precision {
        Precision::Patch => version == base,
        p => version >= base && below(version, wildcard_upper(base, p)),
    }
}

/// `version < upper`; `None` is an upper bound past every version
fn below(version: &Version, upper: Option<Version>) -> bool {
    upper.is_none_or(|upper| *version < upper)
}

/// Exclusive upper bound of the wildcard range of a partial version.
///
/// `None` when the bumped component would overflow.
fn wildcard_upper(base: &Version, precision: Precision) -> Option<Version> {
    match precision {
        Precision::Major => Some(Version::new(base.major.checked_add(1)?, 0, 0)),
        Precision::Minor => Some(Version::new(base.major, base.minor.checked_add(1)?, 0)),
        Precision::Patch => Some(Version::new(
            base.major,
            base.minor,
            base.patch.checked_add(1)?,
        )),
    }
}

/// Exclusive upper bound of a caret range; `None` on overflow
fn caret_upper(base: &Version, precision: Precision) -> Option<Version> {
    if base.major > 0 || precision == Precision::Major {
        wildcard_upper(base, Precision::Major)
    } else if base.minor > 0 || precision == Precision::Minor {
        wildcard_upper(base, Precision::Minor)
    } else {
        wildcard_upper(base, Precision::Patch)
    }
}
