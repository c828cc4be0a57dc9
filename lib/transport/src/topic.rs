use std::fmt;
use std::str::FromStr;

use serde::de::{value, Error};

const PREFIX: &str = "elektra";

#[derive(Debug, PartialEq)]
pub enum Topic {
    Action,
    State(String),
}

impl Topic {
    pub fn state(uid: &str) -> Topic {
        Topic::State(uid.to_string())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Topic::Action => write!(f, "{PREFIX}/action"),
            Topic::State(uid) => write!(f, "{PREFIX}/state/{uid}"),
        }
    }
}

impl FromStr for Topic {
    type Err = value::Error;

    fn from_str(s: &str) -> std::result::Result<Topic, Self::Err> {
        const ERROR_MSG: &str = "supported topics are elektra/action and elektra/state/<uid>";

        let rest = s
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| value::Error::custom(ERROR_MSG))?;

        match rest {
            "action" => Ok(Topic::Action),
            _ => match rest.split_once('/') {
                Some(("state", uid)) if !uid.is_empty() && !uid.contains('/') => {
                    Ok(Topic::State(uid.to_string()))
                }
                _ => Err(value::Error::custom(ERROR_MSG)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        assert_eq!(Topic::Action.to_string(), "elektra/action");
        assert_eq!(Topic::state("23987").to_string(), "elektra/state/23987");
    }

    #[test]
    fn test_parsing() {
        assert_eq!(Topic::from_str("elektra/action").unwrap(), Topic::Action);
        assert_eq!(
            Topic::from_str("elektra/state/23987").unwrap(),
            Topic::State("23987".to_string())
        );

        assert!(Topic::from_str("elektra/state/").is_err());
        assert!(Topic::from_str("elektra/state/1/2").is_err());
        assert!(Topic::from_str("elektra/unknown").is_err());
        assert!(Topic::from_str("state/23987").is_err());
        assert!(Topic::from_str("elektraaction").is_err());
    }
}
