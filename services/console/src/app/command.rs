//! services/console/src/app/command.rs
//!
//! Parses console lines into commands and dispatches them against the console.

use std::str::FromStr;

use catalog_core::domain::Credentials;
use catalog_core::form::{FieldInput, ProductField};
use catalog_core::modal::ModalMode;
use tracing::debug;

use crate::app::state::Console;
use crate::error::ConsoleError;

//=========================================================================================
// Commands
//=========================================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Every action a user can take from the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login(Credentials),
    List,
    New,
    Edit(usize),
    Delete(usize),
    Set { field: String, value: String },
    Check(bool),
    /// 1-based slot; an empty value clears it.
    Image { slot: usize, url: String },
    AddImage,
    RemoveImage,
    Save,
    Cancel,
    Quit,
}

impl Command {
    /// A label for logs. Never includes the arguments, which may hold a password.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Login(_) => "login",
            Command::List => "list",
            Command::New => "new",
            Command::Edit(_) => "edit",
            Command::Delete(_) => "delete",
            Command::Set { .. } => "set",
            Command::Check(_) => "check",
            Command::Image { .. } => "image",
            Command::AddImage => "image add",
            Command::RemoveImage => "image remove",
            Command::Save => "save",
            Command::Cancel => "cancel",
            Command::Quit => "quit",
        }
    }
}

/// Whether the console loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <username> <password>   sign in
  list                          reload the product list
  new                           open the dialog for a new product
  edit <row> | delete <row>     open the dialog for the product in <row>
  set <field> <value>           set title, category, origin_price, price, unit,
                                description, content or imageUrl
  check <on|off>                enable or disable the product
  image <slot> [url]            set or clear a secondary image (slots 1-5)
  image add | image remove      add or remove the last image slot
  save                          confirm the dialog
  cancel                        close the dialog
  quit                          leave the console";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "login" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(username), Some(password), None) => Ok(Command::Login(Credentials {
                        username: username.to_string(),
                        password: password.to_string(),
                    })),
                    _ => Err(CommandError::Usage("login <username> <password>")),
                }
            }
            "list" => Ok(Command::List),
            "new" | "create" => Ok(Command::New),
            "edit" => parse_row(rest, "edit <row>").map(Command::Edit),
            "delete" => parse_row(rest, "delete <row>").map(Command::Delete),
            "set" => match rest.split_once(char::is_whitespace) {
                Some((field, value)) => Ok(Command::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                }),
                None if !rest.is_empty() => Ok(Command::Set {
                    field: rest.to_string(),
                    value: String::new(),
                }),
                None => Err(CommandError::Usage("set <field> <value>")),
            },
            "check" => match rest {
                "on" | "yes" | "true" => Ok(Command::Check(true)),
                "off" | "no" | "false" => Ok(Command::Check(false)),
                _ => Err(CommandError::Usage("check <on|off>")),
            },
            "image" => parse_image(rest),
            "save" | "confirm" => Ok(Command::Save),
            "cancel" | "close" => Ok(Command::Cancel),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

fn parse_row(rest: &str, usage: &'static str) -> Result<usize, CommandError> {
    rest.parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .ok_or(CommandError::Usage(usage))
}

fn parse_image(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "image <slot> [url] | image add | image remove";
    let (head, url) = match rest.split_once(char::is_whitespace) {
        Some((head, url)) => (head, url.trim()),
        None => (rest, ""),
    };
    match head {
        "add" if url.is_empty() => Ok(Command::AddImage),
        "remove" if url.is_empty() => Ok(Command::RemoveImage),
        _ => {
            let slot = head
                .parse::<usize>()
                .ok()
                .filter(|slot| *slot > 0)
                .ok_or(CommandError::Usage(USAGE))?;
            Ok(Command::Image {
                slot,
                url: url.to_string(),
            })
        }
    }
}

//=========================================================================================
// Dispatch
//=========================================================================================

impl Console {
    /// Parses and runs one console line. Failures become notices.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Command>() {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                self.report("Invalid command", &ConsoleError::from(e));
                Flow::Continue
            }
        }
    }

    pub async fn dispatch(&mut self, command: Command) -> Flow {
        debug!(command = command.name(), "Dispatching command");
        let (action, result) = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.state.push_info(HELP);
                return Flow::Continue;
            }
            Command::Login(credentials) => ("Sign-in failed", self.sign_in(credentials).await),
            Command::List => ("Failed to load products", self.refresh_products().await),
            Command::New => ("Cannot open the dialog", self.open_create()),
            Command::Edit(row) => ("Cannot open the dialog", self.open_row(ModalMode::Edit, row)),
            Command::Delete(row) => (
                "Cannot open the dialog",
                self.open_row(ModalMode::Delete, row),
            ),
            Command::Set { field, value } => ("Cannot change the field", self.set_field(&field, value)),
            Command::Check(checked) => (
                "Cannot change the field",
                self.state
                    .editor
                    .edit_field(ProductField::IsEnabled, FieldInput::Checkbox(checked))
                    .map_err(ConsoleError::from),
            ),
            Command::Image { slot, url } => (
                "Cannot change the image",
                match slot.checked_sub(1) {
                    Some(index) => self
                        .state
                        .editor
                        .edit_image_at(index, url)
                        .map_err(ConsoleError::from),
                    None => Err(CommandError::Usage("image <slot> [url]").into()),
                },
            ),
            Command::AddImage => (
                "Cannot add an image slot",
                self.state.editor.add_image_slot().map_err(ConsoleError::from),
            ),
            Command::RemoveImage => (
                "Cannot remove an image slot",
                self.state
                    .editor
                    .remove_last_image_slot()
                    .map_err(ConsoleError::from),
            ),
            Command::Save => ("Saving failed", self.confirm().await),
            Command::Cancel => {
                self.close_modal();
                ("", Ok(()))
            }
        };

        if let Err(e) = result {
            self.report(action, &e);
        }
        Flow::Continue
    }

    fn set_field(&mut self, field: &str, value: String) -> Result<(), ConsoleError> {
        let field = field.parse::<ProductField>()?;
        let input = if field.is_checkbox() {
            FieldInput::Checkbox(matches!(value.as_str(), "on" | "yes" | "true" | "1"))
        } else {
            FieldInput::Text(value)
        };
        self.state.editor.edit_field(field, input)?;
        Ok(())
    }
}
