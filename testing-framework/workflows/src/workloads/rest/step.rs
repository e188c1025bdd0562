use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepParseError {
    #[error("unknown workload step '{0}' (expected rest:target, rest:login or rest:push)")]
    Unknown(String),
    #[error("workload step list is empty")]
    Empty,
}

/// One operation of the REST workflow, named as on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestStep {
    Target,
    Login,
    Push,
}

impl RestStep {
    pub const ALL: [Self; 3] = [Self::Target, Self::Login, Self::Push];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Target => "rest:target",
            Self::Login => "rest:login",
            Self::Push => "rest:push",
        }
    }

    /// Parses a comma separated list such as `rest:target,rest:login`.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, StepParseError> {
        let steps = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(StepParseError::Empty);
        }
        Ok(steps)
    }
}

impl fmt::Display for RestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RestStep {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.name() == s)
            .ok_or_else(|| StepParseError::Unknown(s.to_owned()))
    }
}
