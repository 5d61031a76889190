use crate::error::{self, Error, Result};
use std::str::FromStr;

/// Parameters to set on a component, parsed from a single comma separated
/// `key=value,...` argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentParams {
    pairs: Vec<(String, String)>,
}

impl DeploymentParams {
    /// Look up a parameter value. When a key was given more than once the
    /// last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromStr for DeploymentParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for pair in s.split(',') {
            // Split on the first '=' only so that values may contain '='.
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => pairs.push((key.to_string(), value.to_string())),
                _ => return error::InvalidParamSnafu { pair }.fail(),
            }
        }
        Ok(DeploymentParams { pairs })
    }
}

#[cfg(test)]
mod test {
    use super::DeploymentParams;
    use crate::error::Error;

    #[test]
    fn parses_comma_separated_pairs() {
        let params: DeploymentParams = "namespace=foo,replicas=2".parse().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("namespace"), Some("foo"));
        assert_eq!(params.get("replicas"), Some("2"));
    }

    #[test]
    fn values_may_contain_equals() {
        let params: DeploymentParams = "modelPath=gs://bucket/model?version=1".parse().unwrap();
        assert_eq!(params.get("modelPath"), Some("gs://bucket/model?version=1"));
    }

    #[test]
    fn missing_equals_is_rejected() {
        let error = "namespace=foo,replicas".parse::<DeploymentParams>().unwrap_err();
        assert!(matches!(error, Error::InvalidParam { pair } if pair == "replicas"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!("".parse::<DeploymentParams>().is_err());
    }

    #[test]
    fn last_write_wins_on_repeated_keys() {
        let params: DeploymentParams = "namespace=foo,namespace=bar".parse().unwrap();
        assert_eq!(params.get("namespace"), Some("bar"));
    }

    #[test]
    fn pairs_keep_their_order() {
        let params: DeploymentParams = "a=1,b=2,c=3".parse().unwrap();
        let keys: Vec<&str> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
