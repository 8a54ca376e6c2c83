use std::error::Error;
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Birth on 3, survive on 2 or 3.
///
/// Every engine steps with this regardless of the `Rule` a pattern was loaded with.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    neighbors == 3 || (alive && neighbors == 2)
}

/// Birth/survival neighbor counts in `B<digits>/S<digits>` notation
///
/// Carried as pattern metadata only.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rule {
    pub born: Vec<u8>,
    pub survive: Vec<u8>,
}
impl Rule {
    pub fn conway() -> Self {
        Self {
            born: vec![3],
            survive: vec![2, 3],
        }
    }
    pub fn is_conway(&self) -> bool {
        *self == Self::conway()
    }
}
impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}
impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B")?;
        for b in &self.born {
            write!(f, "{b}")?;
        }
        write!(f, "/S")?;
        for s in &self.survive {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RuleError(String);
impl Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid rule {:?}, expected B<digits>/S<digits>", self.0)
    }
}
impl Error for RuleError {}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || RuleError(s.to_owned());
        let (born, survive) = s.split_once('/').ok_or_else(fail)?;
        let born = born.strip_prefix(['B', 'b']).ok_or_else(fail)?;
        let survive = survive.strip_prefix(['S', 's']).ok_or_else(fail)?;
        Ok(Self {
            born: parse_counts(born).ok_or_else(fail)?,
            survive: parse_counts(survive).ok_or_else(fail)?,
        })
    }
}
fn parse_counts(digits: &str) -> Option<Vec<u8>> {
    digits
        .bytes()
        .map(|b| match b {
            b'0'..=b'8' => Some(b - b'0'),
            _ => None,
        })
        .collect()
}
