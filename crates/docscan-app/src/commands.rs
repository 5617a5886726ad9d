use std::io::BufRead;

use docscan_types::ImageOrigin;
use kanal::Sender;

pub const HELP: &str = "\
commands:
  file <path>     pick an existing image
  camera <path>   use a frame written by the camera
  submit          send the current image for recognition
  reset           drop the current image
  status          redraw the session
  help            show this text
  quit            leave";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// An empty path is a cancelled picker
    Acquire { origin: ImageOrigin, path: String },
    Submit,
    Reset,
    Status,
    Help,
    Quit,
    Invalid(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),
}

impl UserCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "file" | "f" => UserCommand::Acquire {
                origin: ImageOrigin::File,
                path: rest.to_string(),
            },
            "camera" | "c" => UserCommand::Acquire {
                origin: ImageOrigin::Camera,
                path: rest.to_string(),
            },
            "submit" | "s" => UserCommand::Submit,
            "reset" => UserCommand::Reset,
            "status" => UserCommand::Status,
            "help" | "?" => UserCommand::Help,
            "quit" | "exit" | "q" => UserCommand::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        Ok(command)
    }
}

/// Forward parsed lines until input ends or the receiver is gone.
/// End of input counts as `quit`.
pub fn read_commands<R: BufRead>(reader: R, tx: &Sender<UserCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = UserCommand::parse(&line).unwrap_or_else(|e| UserCommand::Invalid(e.to_string()));
        tracing::debug!("[INPUT] {:?}", command);

        if tx.send(command).is_err() {
            return;
        }
    }

    let _ = tx.send(UserCommand::Quit);
}
