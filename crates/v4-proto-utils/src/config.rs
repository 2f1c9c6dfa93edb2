use serde::{
    Deserialize,
    Serialize,
};
use v4_proto::amino::Omission;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log filter directives.
    pub log: String,
    /// The Amino omission rule used unless `--omit` is given.
    pub amino_omit: Omission,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: "warn".to_string(),
            amino_omit: Omission::default(),
        }
    }
}

impl v4_config::Config for Config {
    const PREFIX: &'static str = "V4_PROTO_UTILS_";
}

#[cfg(test)]
mod tests {
    use super::Config;

    const EXAMPLE_ENV: &str = include_str!("../local.env.example");

    #[test]
    fn example_env_config_is_up_to_date() {
        v4_config::example_env_config_is_up_to_date::<Config>(EXAMPLE_ENV);
    }

    #[test]
    #[should_panic]
    fn config_should_reject_unknown_var() {
        v4_config::config_should_reject_unknown_var::<Config>(EXAMPLE_ENV);
    }
}
