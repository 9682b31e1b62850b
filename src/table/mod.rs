//! Album table reading and writing.
//!
//! Tables are `;`-delimited with the columns `AlbumName`, `AlbumId`, `Role`
//! followed by any number of `User N` columns, one email per cell.

mod reader;
mod writer;

pub use reader::{parse_desired_states, read_desired_states};
pub use writer::{default_output_path, write_export, write_rows};

/// Field delimiter used by album tables.
pub const DELIMITER: u8 = b';';

/// Album name column.
pub const COL_ALBUM_NAME: &str = "AlbumName";

/// Album identifier column.
pub const COL_ALBUM_ID: &str = "AlbumId";

/// Role column.
pub const COL_ROLE: &str = "Role";

/// Prefix shared by user columns.
pub const USER_COLUMN_PREFIX: &str = "User";

/// Columns every table must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_ALBUM_NAME, COL_ALBUM_ID, COL_ROLE];

/// Name of the n-th (1-based) user column.
#[must_use]
pub fn user_column(n: usize) -> String {
    format!("{USER_COLUMN_PREFIX} {n}")
}
