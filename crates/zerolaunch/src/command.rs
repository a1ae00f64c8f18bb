use anyhow::{bail, Context, Error};

/// A line typed into the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(String),
    Replace(String),
    Back,
    Forward,
    Go(isize),
    Href(String),
    Where,
    Routes,
    Quit,
    Nothing,
}

impl Command {
    /// Parses a command line. A bare path is a push.
    pub fn parse(line: &str) -> Result<Command, Error> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Nothing);
        };
        let argument = words.next();
        if let Some(extra) = words.next() {
            bail!("unexpected argument '{}'", extra);
        }

        let command = match (head, argument) {
            (path, None) if path.starts_with('/') => Command::Push(path.to_string()),
            ("push", Some(path)) => Command::Push(path.to_string()),
            ("replace", Some(path)) => Command::Replace(path.to_string()),
            ("href", Some(path)) => Command::Href(path.to_string()),
            ("go", Some(delta)) => Command::Go(
                delta
                    .parse()
                    .with_context(|| format!("'{}' is not a history offset", delta))?,
            ),
            ("back", None) => Command::Back,
            ("forward", None) => Command::Forward,
            ("where", None) => Command::Where,
            ("routes", None) => Command::Routes,
            ("quit" | "exit", None) => Command::Quit,
            ("push" | "replace" | "href" | "go", None) => bail!("'{}' needs an argument", head),
            _ => bail!("unknown command '{}'", line.trim()),
        };

        Ok(command)
    }
}
