use liker_core::{CompanyId, Msg};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    Missing {
        command: &'static str,
        what: &'static str,
    },
    #[error("`{0}` is not a number")]
    NotANumber(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// `page_size` is the grid's current page size, used where the line omits one.
pub fn parse_command(line: &str, page_size: usize) -> Result<Option<Command>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head {
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "collections" => Command::Dispatch(Msg::Started),
        "open" => {
            let collection_id = rest.first().ok_or(InputError::Missing {
                command: "open",
                what: "a collection id",
            })?;
            Command::Dispatch(Msg::CollectionSelected((*collection_id).to_string()))
        }
        "page" => {
            let page = rest.first().ok_or(InputError::Missing {
                command: "page",
                what: "a page number",
            })?;
            let page = parse_number(page)?;
            let page_size = match rest.get(1) {
                Some(size) => parse_number(size)?,
                None => page_size,
            };
            Command::Dispatch(Msg::PageChanged { page, page_size })
        }
        "select" => match rest.as_slice() {
            [] => {
                return Err(InputError::Missing {
                    command: "select",
                    what: "ids or `none`",
                })
            }
            ["none"] => Command::Dispatch(Msg::SelectionChanged(Vec::new())),
            ids => Command::Dispatch(Msg::SelectionChanged(parse_ids(ids)?)),
        },
        "like" => {
            let id = rest.first().ok_or(InputError::Missing {
                command: "like",
                what: "a company id",
            })?;
            Command::Dispatch(Msg::LikeClicked(parse_id(id)?))
        }
        "like-selected" => Command::Dispatch(Msg::BulkLikeClicked {
            explicit_ids: optional_ids(&rest)?,
        }),
        "like-all" => Command::Dispatch(Msg::BulkLikeAllClicked {
            explicit_ids: optional_ids(&rest)?,
        }),
        "cancel" => Command::Dispatch(Msg::CancelBatchClicked),
        "reset" => Command::Dispatch(Msg::ResetLikedClicked),
        "companies" => {
            let offset = rest.first().map(|w| parse_number(w)).transpose()?;
            let limit = rest.get(1).map(|w| parse_number(w)).transpose()?;
            Command::Dispatch(Msg::CompaniesRequested {
                offset: offset.unwrap_or(0),
                limit: limit.unwrap_or(page_size),
            })
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn optional_ids(words: &[&str]) -> Result<Option<Vec<CompanyId>>, InputError> {
    if words.is_empty() {
        Ok(None)
    } else {
        parse_ids(words).map(Some)
    }
}

fn parse_ids(words: &[&str]) -> Result<Vec<CompanyId>, InputError> {
    words
        .iter()
        .flat_map(|word| word.split(','))
        .filter(|part| !part.is_empty())
        .map(parse_id)
        .collect()
}

fn parse_id(word: &str) -> Result<CompanyId, InputError> {
    word.parse()
        .map_err(|_| InputError::NotANumber(word.to_string()))
}

fn parse_number(word: &str) -> Result<usize, InputError> {
    word.parse()
        .map_err(|_| InputError::NotANumber(word.to_string()))
}
