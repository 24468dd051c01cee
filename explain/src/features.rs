//! Binarization of the features of a classifier.
//!
//! A feature map file associates each feature with a list of conditions on its value, each
//! condition being represented by a literal of the decision diagram:
//!
//! ```text
//! # comments and blank lines are ignored
//! NF: 2
//! Type: discrete,continuous
//! Map:
//! color:=red:1
//! color:{green,blue}:2
//! age:[0,18):3
//! age:[18,inf):-3
//! ```
//!
//! The list of domain kinds may also be given on the line following `Type:`.

use crate::error::{Result, XpError};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use xdd_diagram::Lit;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    /// Values are compared as strings.
    Discrete,
    /// Values are real numbers, compared against intervals.
    Continuous,
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "discrete" => Ok(Domain::Discrete),
            "continuous" => Ok(Domain::Continuous),
            other => Err(format!("unknown domain kind \"{other}\"")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub lower_closed: bool,
    pub upper: f64,
    pub upper_closed: bool,
}

impl Interval {
    pub fn contains(&self, x: f64) -> bool {
        let above = if self.lower_closed { x >= self.lower } else { x > self.lower };
        let below = if self.upper_closed { x <= self.upper } else { x < self.upper };
        above && below
    }
}

/// A condition on the value of a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Equal(String),
    NotEqual(String),
    OneOf(Vec<String>),
    Within(Interval),
}

impl Condition {
    /// Parses a condition, as written in a feature map, for a feature of the given domain.
    pub fn parse(cond: &str, domain: Domain) -> std::result::Result<Condition, String> {
        let cond = cond.trim();
        match domain {
            Domain::Discrete => {
                if let Some(value) = cond.strip_prefix("!=") {
                    Ok(Condition::NotEqual(value.trim().to_string()))
                } else if let Some(value) = cond.strip_prefix('=') {
                    Ok(Condition::Equal(value.trim().to_string()))
                } else if let Some(values) = cond.strip_prefix('{') {
                    let values = values
                        .strip_suffix('}')
                        .ok_or_else(|| format!("unterminated set \"{cond}\""))?;
                    Ok(Condition::OneOf(values.split(',').map(|v| v.trim().to_string()).collect()))
                } else {
                    Err(format!("invalid discrete condition \"{cond}\", expected =v, !=v or {{v1,...}}"))
                }
            }
            Domain::Continuous => {
                let mut chars = cond.chars();
                let lower_closed = match chars.next() {
                    Some('[') => true,
                    Some('(') => false,
                    _ => return Err(format!("invalid interval \"{cond}\", expected [ or (")),
                };
                let upper_closed = match chars.next_back() {
                    Some(']') => true,
                    Some(')') => false,
                    _ => return Err(format!("invalid interval \"{cond}\", expected ] or )")),
                };
                let bounds = chars.as_str().split(',').map(str::trim).collect::<Vec<_>>();
                let [lower, upper] = bounds[..] else {
                    return Err(format!("invalid interval \"{cond}\", expected two bounds"));
                };
                let bound = |b: &str| {
                    b.parse::<f64>()
                        .map_err(|_| format!("invalid interval bound \"{b}\" in \"{cond}\""))
                };
                Ok(Condition::Within(Interval {
                    lower: bound(lower)?,
                    lower_closed,
                    upper: bound(upper)?,
                    upper_closed,
                }))
            }
        }
    }

    /// Whether the (raw) value satisfies the condition.
    /// Fails if an interval is tested against a value that is not a number.
    pub fn holds(&self, value: &str) -> std::result::Result<bool, String> {
        let value = value.trim();
        Ok(match self {
            Condition::Equal(v) => value == v.as_str(),
            Condition::NotEqual(v) => value != v.as_str(),
            Condition::OneOf(vs) => vs.iter().any(|v| v.as_str() == value),
            Condition::Within(interval) => {
                let x = value
                    .parse::<f64>()
                    .map_err(|_| format!("\"{value}\" is not a number"))?;
                interval.contains(x)
            }
        })
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Equal(v) => write!(f, "={v}"),
            Condition::NotEqual(v) => write!(f, "!={v}"),
            Condition::OneOf(vs) => write!(f, "{{{}}}", vs.join(",")),
            Condition::Within(i) => write!(
                f,
                "{}{},{}{}",
                if i.lower_closed { '[' } else { '(' },
                i.lower,
                i.upper,
                if i.upper_closed { ']' } else { ')' }
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Feature {
    pub name: String,
    pub domain: Domain,
    /// Conditions binarizing the feature, with the literal standing for each of them.
    pub encoding: Vec<(Condition, Lit)>,
}

impl Feature {
    /// Literals implied by the value of the feature: for each condition, its literal if the value
    /// satisfies it and the negation otherwise. The result is sorted by variable, without duplicates.
    pub fn encode(&self, value: &str) -> Result<SmallVec<[Lit; 4]>> {
        let mut lits = SmallVec::<[Lit; 4]>::new();
        for (condition, lit) in &self.encoding {
            let holds = condition
                .holds(value)
                .map_err(|e| XpError::malformed(format!("feature {}: {e}", self.name)))?;
            lits.push(if holds { *lit } else { !*lit });
        }
        lits.sort();
        lits.dedup();
        if let Some(w) = lits.windows(2).find(|w| w[0].var() == w[1].var()) {
            return Err(XpError::InconsistentLiterals {
                feature: self.name.clone(),
                lit: w[1],
            });
        }
        Ok(lits)
    }
}

#[derive(Clone, Debug)]
pub struct FeatureMap {
    features: Vec<Feature>,
}

impl FeatureMap {
    pub fn read(path: impl AsRef<Path>) -> Result<FeatureMap> {
        std::fs::read_to_string(path)?.parse()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Names of the given features, `None` if one of them is not a feature of the map.
    pub fn names<'i>(&self, features: impl IntoIterator<Item = &'i usize>) -> Option<Vec<&str>> {
        features
            .into_iter()
            .map(|&i| self.features.get(i).map(|f| f.name.as_str()))
            .collect()
    }
}

impl FromStr for FeatureMap {
    type Err = XpError;

    fn from_str(input: &str) -> Result<Self> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));
        let mut expect = |what: &str| {
            lines
                .next()
                .ok_or_else(|| XpError::malformed(format!("feature map: missing {what}")))
        };

        let (line, header) = expect("NF header")?;
        let num_features: usize = header
            .strip_prefix("NF:")
            .and_then(|n| n.trim().parse().ok())
            .ok_or_else(|| {
                XpError::parse(line, format!("expected \"NF: <number of features>\", got \"{header}\""))
            })?;

        let (line, types) = expect("Type line")?;
        let types = types
            .strip_prefix("Type:")
            .ok_or_else(|| XpError::parse(line, format!("expected \"Type:\", got \"{types}\"")))?
            .trim();
        let (line, types) = if types.is_empty() { expect("domain kinds")? } else { (line, types) };
        let domains = types
            .split(',')
            .map(|t| t.trim().parse::<Domain>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| XpError::parse(line, e))?;
        if domains.len() != num_features {
            return Err(XpError::parse(
                line,
                format!("{} domain kinds for {num_features} features", domains.len()),
            ));
        }

        let (line, marker) = expect("Map marker")?;
        if marker != "Map:" {
            return Err(XpError::parse(line, format!("expected \"Map:\", got \"{marker}\"")));
        }

        let mut features: Vec<Feature> = Vec::with_capacity(num_features);
        for (line, entry) in lines {
            let fields = entry.split(':').collect::<Vec<_>>();
            if fields.len() < 3 {
                return Err(XpError::parse(line, format!("expected name:condition:literal, got \"{entry}\"")));
            }
            let name = fields[0].trim();
            let cond = fields[fields.len() - 2];
            let lit = fields[fields.len() - 1]
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(Lit::from_signed)
                .ok_or_else(|| XpError::parse(line, format!("invalid literal in \"{entry}\"")))?;

            let index = match features.iter().position(|f| f.name == name) {
                Some(i) => i,
                None => {
                    if features.len() == num_features {
                        return Err(XpError::parse(
                            line,
                            format!("feature \"{name}\" exceeds the {num_features} declared features"),
                        ));
                    }
                    features.push(Feature {
                        name: name.to_string(),
                        domain: domains[features.len()],
                        encoding: Vec::new(),
                    });
                    features.len() - 1
                }
            };
            let condition = Condition::parse(cond, features[index].domain)
                .map_err(|e| XpError::parse(line, format!("feature \"{name}\": {e}")))?;
            features[index].encoding.push((condition, lit));
        }

        if features.len() != num_features {
            return Err(XpError::malformed(format!(
                "feature map declares {num_features} features but maps {}",
                features.len()
            )));
        }
        Ok(FeatureMap { features })
    }
}
