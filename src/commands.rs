/// Command palette entries and autocomplete

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

pub const COMMANDS: &[Command] = &[
  Command {
    name: "users",
    aliases: &["u", "user", "team"],
    description: "Team members",
  },
  Command {
    name: "demos",
    aliases: &["d", "demo"],
    description: "Demo schedule",
  },
  Command {
    name: "theme",
    aliases: &["t", "scheme"],
    description: "Toggle light/dark colors",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit teamdeck",
  },
];

/// Resolved palette action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Users,
  Demos,
  Theme,
  Quit,
}

impl Action {
  /// Parse a submitted command name or alias
  pub fn parse(input: &str) -> Option<Self> {
    let input = input.trim().to_lowercase();
    let cmd = COMMANDS
      .iter()
      .find(|c| c.name == input || c.aliases.contains(&input.as_str()))?;
    match cmd.name {
      "users" => Some(Action::Users),
      "demos" => Some(Action::Demos),
      "theme" => Some(Action::Theme),
      "quit" => Some(Action::Quit),
      _ => None,
    }
  }
}

/// Autocomplete suggestions for `input`, best match first
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();
  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u8)> = COMMANDS
    .iter()
    .filter_map(|cmd| {
      let rank = if cmd.name == input {
        0
      } else if cmd.aliases.contains(&input.as_str()) {
        1
      } else if cmd.name.starts_with(&input) {
        2
      } else if cmd.aliases.iter().any(|a| a.starts_with(&input)) {
        3
      } else if cmd.name.contains(&input) {
        4
      } else {
        return None;
      };
      Some((cmd, rank))
    })
    .collect();

  // Stable sort keeps declaration order within a rank
  matches.sort_by_key(|(_, rank)| *rank);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    assert_eq!(get_suggestions("").len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match_first() {
    assert_eq!(get_suggestions("demos")[0].name, "demos");
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(get_suggestions("team")[0].name, "users");
    assert_eq!(get_suggestions("d")[0].name, "demos");
  }

  #[test]
  fn test_prefix_and_contains() {
    assert_eq!(get_suggestions("th")[0].name, "theme");
    assert_eq!(get_suggestions("emo")[0].name, "demos");
    assert!(get_suggestions("zzz").is_empty());
  }

  #[test]
  fn test_parse_action() {
    assert_eq!(Action::parse("users"), Some(Action::Users));
    assert_eq!(Action::parse(" Q "), Some(Action::Quit));
    assert_eq!(Action::parse("scheme"), Some(Action::Theme));
    assert_eq!(Action::parse("boards"), None);
  }
}
