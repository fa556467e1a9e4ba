pub const PROMPT: &str = "liker> ";
pub const PROGRESS_BAR_WIDTH: usize = 30;
pub const LIKE_MARK: &str = "♥";
pub const SELECTED_MARK: &str = "[x]";
pub const UNSELECTED_MARK: &str = "[ ]";

pub const HELP_TEXT: &str = "\
commands:
  collections                 reload and list collections
  open <collection-id>        show a collection from its first page
  page <page> [size]          go to a zero-based page
  select <id>...              replace the selection
  select none                 clear the selection
  like <id>                   like one company
  like-selected [ids...]      like the given ids, or the selection, in one request
  like-all [ids...]           like the given ids, the selection, or the whole collection in chunks
  cancel                      stop the running like-all before its next chunk
  reset                       unlike every company
  companies [offset] [limit]  list companies outside any collection
  help                        show this text
  quit                        leave";
