//! Configuration for both the daemon and the controller.

pub mod error;

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

pub use error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration object used in the daemon and controller.
///
/// User configuration being opt-in for every option, a different type is used, [`UserConfig`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Config {
  pub defaults: DefaultsConfig,
  pub search: SearchConfig,
  pub history: HistoryConfig,
  pub state: StateConfig,

  #[serde(default)]
  pub rules: Vec<RuleConfig>,
}

impl Config {
  /// Load the configuration from a given path.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| ConfigError::CannotReadConfig {
      path: path.to_owned(),
      err,
    })?;

    let config: Self = toml::from_str(&content).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })?;
    config.validate()?;

    Ok(config)
  }

  /// Default configuration using the `default-config.toml` file.
  const DEFAULT_CONFIG_CONTENT: &'static str = include_str!("../../default-config.toml");

  pub fn load_default_config() -> Result<Self, ConfigError> {
    log::debug!("loading default configuration");

    toml::from_str(Self::DEFAULT_CONFIG_CONTENT).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })
  }

  /// Load the default configuration, the user configuration, and merge both.
  pub fn load_default_user() -> Result<Self, ConfigError> {
    let mut config = Self::load_default_config()?;
    match UserConfig::load_from_xdg() {
      Ok(user_config) => {
        config.merge_user_config(user_config)?;
      }

      Err(err) => {
        log::warn!("cannot load user config: {err}");
      }
    }

    Ok(config)
  }

  /// Merge the config with a user-provided one.
  pub fn merge_user_config(&mut self, user_config: UserConfig) -> Result<(), ConfigError> {
    if let Some(user_defaults) = user_config.defaults {
      self.defaults.merge_user_config(user_defaults);
    }

    if let Some(user_search) = user_config.search {
      self.search.merge_user_config(user_search);
    }

    if let Some(user_history) = user_config.history {
      self.history.merge_user_config(user_history);
    }

    if let Some(user_state) = user_config.state {
      self.state.merge_user_config(user_state);
    }

    if let Some(rules) = user_config.rules {
      self.rules.extend(rules);
    }

    self.validate()
  }

  fn validate(&self) -> Result<(), ConfigError> {
    self.rules.iter().try_for_each(RuleConfig::validate)
  }
}

/// Initial values of the fixed checkboxes, used when nothing was persisted yet.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DefaultsConfig {
  pub sensitive_case: bool,
  pub begin_word: bool,
  pub end_word: bool,

  /// Per case transform id (`kebabCase`, `camelCase`, …).
  ///
  /// A transform missing from the map is selected.
  #[serde(default)]
  pub cases: BTreeMap<String, bool>,
}

impl DefaultsConfig {
  /// Default value of the case transform checkbox `id`.
  pub fn case(&self, id: &str) -> bool {
    self.cases.get(id).copied().unwrap_or(true)
  }

  fn merge_user_config(&mut self, user_config: UserDefaultsConfig) {
    if let Some(sensitive_case) = user_config.sensitive_case {
      self.sensitive_case = sensitive_case;
    }

    if let Some(begin_word) = user_config.begin_word {
      self.begin_word = begin_word;
    }

    if let Some(end_word) = user_config.end_word {
      self.end_word = end_word;
    }

    self.cases.extend(user_config.cases);
  }
}

/// Search collaborator configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SearchConfig {
  /// Program and arguments fed with every search request on stdin.
  ///
  /// When absent, search requests are written to stdout.
  pub command: Option<Vec<String>>,
}

impl SearchConfig {
  fn merge_user_config(&mut self, user_config: UserSearchConfig) {
    if user_config.command.is_some() {
      self.command = user_config.command;
    }
  }
}

/// Free-text history configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HistoryConfig {
  /// Maximum number of remembered entries.
  pub max_len: usize,
}

impl Default for HistoryConfig {
  fn default() -> Self {
    Self { max_len: 20 }
  }
}

impl HistoryConfig {
  fn merge_user_config(&mut self, user_config: UserHistoryConfig) {
    if let Some(max_len) = user_config.max_len {
      self.max_len = max_len;
    }
  }
}

/// Persisted state configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StateConfig {
  pub path: Option<PathBuf>,
}

impl StateConfig {
  /// Path of the key/value store file.
  ///
  /// Falls back to the XDG data directory when no path is configured.
  pub fn resolve_path(&self) -> Option<PathBuf> {
    self
      .path
      .clone()
      .or_else(|| dirs::data_dir().map(|dir| dir.join("case-search/state.json")))
  }

  fn merge_user_config(&mut self, user_config: UserStateConfig) {
    if user_config.path.is_some() {
      self.path = user_config.path;
    }
  }
}

/// Declarative constraint between two checkbox groups.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleConfig {
  /// Selecting anything in one group unselects everything in the other one.
  Exclusive { a: String, b: String },

  /// `group` is enabled only while something in `target` is selected.
  EnabledWhenAny { group: String, target: String },

  /// `group` is disabled while something in `target` is selected.
  DisabledWhenAny { group: String, target: String },
}

impl RuleConfig {
  fn validate(&self) -> Result<(), ConfigError> {
    match self {
      RuleConfig::Exclusive { a, b } if a == b => Err(ConfigError::invalid_rule(
        format!("exclusive {a}/{b}"),
        "a group cannot exclude itself",
      )),

      RuleConfig::EnabledWhenAny { group, target } | RuleConfig::DisabledWhenAny { group, target }
        if group == target =>
      {
        Err(ConfigError::invalid_rule(
          format!("{group} on {target}"),
          "a group cannot depend on itself",
        ))
      }

      _ => Ok(()),
    }
  }
}

/// User version of configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
  pub defaults: Option<UserDefaultsConfig>,
  pub search: Option<UserSearchConfig>,
  pub history: Option<UserHistoryConfig>,
  pub state: Option<UserStateConfig>,
  pub rules: Option<Vec<RuleConfig>>,
}

impl UserConfig {
  /// Load the config from the default user location (XDG).
  pub fn load_from_xdg() -> Result<Self, ConfigError> {
    log::debug!("loading user configuration");

    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("case-search/config.toml");
    Self::load(path)
  }

  /// Load the configuration from a given path.
  fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();

    log::debug!("loading configuration at {path}", path = path.display());

    let content = fs::read_to_string(path).map_err(|err| ConfigError::CannotReadConfig {
      path: path.to_owned(),
      err,
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })
  }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserDefaultsConfig {
  pub sensitive_case: Option<bool>,
  pub begin_word: Option<bool>,
  pub end_word: Option<bool>,

  #[serde(default)]
  pub cases: BTreeMap<String, bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserSearchConfig {
  pub command: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserHistoryConfig {
  pub max_len: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserStateConfig {
  pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use crate::{
    Config, ConfigError, RuleConfig, UserConfig, UserDefaultsConfig, UserHistoryConfig,
    UserStateConfig,
  };

  #[test]
  fn default_config() {
    let config = Config::load_default_config().unwrap();

    assert!(config.defaults.sensitive_case);
    assert!(!config.defaults.begin_word);
    assert!(!config.defaults.end_word);
    assert_eq!(config.defaults.cases.len(), 7);
    assert!(config.defaults.case("pathCase"));
    assert_eq!(config.search.command, None);
    assert_eq!(config.history.max_len, 20);
    assert!(config.rules.is_empty());
  }

  #[test]
  fn user_merge() {
    let main_config = Config::load_default_config().unwrap();

    // merging a default user config to a config shouldn’t change anything
    {
      let mut config = main_config.clone();
      assert!(config.merge_user_config(UserConfig::default()).is_ok());
      assert_eq!(main_config, config);
    }

    {
      let mut config = main_config.clone();
      let user_config = UserConfig {
        defaults: Some(UserDefaultsConfig {
          begin_word: Some(true),
          cases: [("pathCase".to_owned(), false)].into_iter().collect(),
          ..Default::default()
        }),
        history: Some(UserHistoryConfig { max_len: Some(3) }),
        state: Some(UserStateConfig {
          path: Some(PathBuf::from("/tmp/state.json")),
        }),
        rules: Some(vec![RuleConfig::Exclusive {
          a: "filesToInclude".to_owned(),
          b: "filesToExclude".to_owned(),
        }]),
        ..Default::default()
      };

      assert!(config.merge_user_config(user_config).is_ok());

      assert!(config.defaults.begin_word);
      assert!(!config.defaults.end_word);
      assert!(!config.defaults.case("pathCase"));
      assert!(config.defaults.case("kebabCase"));
      assert_eq!(config.history.max_len, 3);
      assert_eq!(
        config.state.resolve_path(),
        Some(PathBuf::from("/tmp/state.json"))
      );
      assert_eq!(config.rules.len(), 1);
    }
  }

  #[test]
  fn user_rules() {
    let toml = r#"
      [[rules]]
      kind = "disabled-when-any"
      group = "word"
      target = "filesToExclude"
    "#;
    let user_config = toml::from_str::<UserConfig>(toml).unwrap();

    assert_eq!(
      user_config.rules,
      Some(vec![RuleConfig::DisabledWhenAny {
        group: "word".to_owned(),
        target: "filesToExclude".to_owned()
      }])
    );
  }

  #[test]
  fn self_referencing_rule() {
    let mut config = Config::load_default_config().unwrap();
    let user_config = UserConfig {
      rules: Some(vec![RuleConfig::Exclusive {
        a: "case".to_owned(),
        b: "case".to_owned(),
      }]),
      ..Default::default()
    };

    assert!(matches!(
      config.merge_user_config(user_config),
      Err(ConfigError::InvalidRule { .. })
    ));
  }
}
