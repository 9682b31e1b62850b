//! Reads desired album states from a table.
//!
//! The header is parsed once into ordered column names; every data row is
//! then looked up by column name. Rows naming the same album merge into one
//! desired state, in order of first appearance; each row's role applies to
//! the users on that row, so an album may be split across role groups.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{AlbumShareError, Result, TableError};
use crate::model::{normalize_user, AlbumRole, DesiredAlbumState};

use super::{COL_ALBUM_ID, COL_ALBUM_NAME, COL_ROLE, DELIMITER, REQUIRED_COLUMNS, USER_COLUMN_PREFIX};

/// Reads desired album states from a table file.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not a
/// valid album table.
pub fn read_desired_states(path: &Path) -> Result<Vec<DesiredAlbumState>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AlbumShareError::from(TableError::FileNotFound {
            path: path.to_path_buf(),
        }),
        _ => AlbumShareError::Io(e),
    })?;

    info!("Reading album table: {}", path.display());
    let states = parse_desired_states(file)?;
    info!("Loaded {} albums from {}", states.len(), path.display());

    Ok(states)
}

/// Parses desired album states from table content.
///
/// # Errors
///
/// Returns an error if required columns are missing, a role is not
/// recognized, or the content is not valid delimited text.
pub fn parse_desired_states<R: Read>(input: R) -> Result<Vec<DesiredAlbumState>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    validate_columns(&columns)?;

    let user_columns: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|column| is_user_column(column))
        .collect();
    debug!("Found {} user columns", user_columns.len());

    let mut states: Vec<DesiredAlbumState> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in reader.records() {
        let record = record.map_err(|e| TableError::csv(e.to_string()))?;
        let line = record.position().map_or(0, csv::Position::line);

        let row: HashMap<&str, &str> = columns.iter().map(String::as_str).zip(record.iter()).collect();
        let cell = |name: &str| row.get(name).copied().unwrap_or_default();

        let album_id = cell(COL_ALBUM_ID);
        let role_cell = cell(COL_ROLE);
        if album_id.is_empty() || role_cell.is_empty() {
            let missing = if album_id.is_empty() { COL_ALBUM_ID } else { COL_ROLE };
            warn!("Skipping line {line}: no {missing}");
            continue;
        }

        let role: AlbumRole = role_cell
            .parse()
            .map_err(|message| TableError::InvalidRow { line, message })?;

        let index = if let Some(&index) = positions.get(album_id) {
            index
        } else {
            positions.insert(album_id.to_string(), states.len());
            states.push(DesiredAlbumState::new(album_id, cell(COL_ALBUM_NAME), role));
            states.len() - 1
        };
        let Some(state) = states.get_mut(index) else {
            continue;
        };

        for user in user_columns.iter().copied().map(&cell) {
            let email = normalize_user(user);
            match state.members.get(&email) {
                Some(kept) if *kept != role => warn!(
                    "Line {line}: {email} already listed on album {album_id} as {kept}, ignoring {role}"
                ),
                _ => {
                    state.add_member(&email, role);
                }
            }
        }
    }

    Ok(states)
}

fn validate_columns(columns: &[String]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|required| !columns.iter().any(|column| column.as_str() == *required))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TableError::MissingColumns {
            missing,
            found: columns.to_vec(),
        }
        .into())
    }
}

fn is_user_column(column: &str) -> bool {
    column
        .get(..USER_COLUMN_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(USER_COLUMN_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Vec<DesiredAlbumState>> {
        parse_desired_states(content.as_bytes())
    }

    fn users(emails: &[&str]) -> BTreeSet<String> {
        emails.iter().map(|e| (*e).to_string()).collect()
    }

    #[test]
    fn test_parse_basic_table() {
        let states = parse(
            "AlbumName;AlbumId;Role;User 1;User 2\n\
             Summer;a1;viewer;Ann@Example.com;bob@example.com\n\
             Winter;a2;Editor;carl@example.com;\n",
        )
        .unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].album_id, "a1");
        assert_eq!(states[0].album_name, "Summer");
        assert_eq!(states[0].role, AlbumRole::Viewer);
        assert_eq!(states[0].users(), users(&["ann@example.com", "bob@example.com"]));
        assert_eq!(states[1].role, AlbumRole::Editor);
        assert_eq!(states[1].users(), users(&["carl@example.com"]));
    }

    #[test]
    fn test_short_rows_and_duplicate_cells() {
        let states = parse(
            "AlbumName;AlbumId;Role;User 1;User 2;User 3\n\
             Summer;a1;viewer;ann@example.com;ANN@example.com\n\
             Empty;a2;viewer\n",
        )
        .unwrap();

        assert_eq!(states[0].users(), users(&["ann@example.com"]));
        assert!(states[1].members.is_empty());
    }

    #[test]
    fn test_missing_columns() {
        let err = parse("AlbumName;AlbumId;User 1\nSummer;a1;ann@example.com\n").unwrap_err();

        match err {
            AlbumShareError::Table(TableError::MissingColumns { missing, found }) => {
                assert_eq!(missing, vec![String::from("Role")]);
                assert_eq!(found.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        assert!(matches!(
            parse("").unwrap_err(),
            AlbumShareError::Table(TableError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_unknown_role_names_the_line() {
        let err = parse(
            "AlbumName;AlbumId;Role;User 1\n\
             Summer;a1;viewer;ann@example.com\n\
             Winter;a2;owner;bob@example.com\n",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            AlbumShareError::Table(TableError::InvalidRow { line: 3, .. })
        ));
    }

    #[test]
    fn test_rows_without_id_or_role_are_skipped() {
        let states = parse(
            "AlbumName;AlbumId;Role;User 1\n\
             NoId;;viewer;ann@example.com\n\
             NoRole;a2;;bob@example.com\n\
             Kept;a3;viewer;carl@example.com\n",
        )
        .unwrap();

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].album_id, "a3");
    }

    #[test]
    fn test_duplicate_album_rows_merge() {
        let states = parse(
            "AlbumName;AlbumId;Role;User 1\n\
             Summer;a1;viewer;ann@example.com\n\
             Winter;a2;viewer;bob@example.com\n\
             Summer;a1;viewer;dora@example.com\n",
        )
        .unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].album_id, "a1");
        assert_eq!(states[0].users(), users(&["ann@example.com", "dora@example.com"]));
        assert_eq!(states[1].album_id, "a2");
    }

    #[test]
    fn test_role_groups_keep_their_roles() {
        let states = parse(
            "AlbumName;AlbumId;Role;User 1;User 2\n\
             Summer;a1;viewer;ann@example.com;\n\
             Summer;a1;editor;bob@example.com;carl@example.com\n\
             Summer;a1;editor;ANN@example.com;\n",
        )
        .unwrap();

        assert_eq!(states.len(), 1);
        let summer = &states[0];
        assert_eq!(summer.role, AlbumRole::Viewer);
        assert_eq!(summer.members.get("ann@example.com"), Some(&AlbumRole::Viewer));
        assert_eq!(summer.members.get("bob@example.com"), Some(&AlbumRole::Editor));
        assert_eq!(summer.members.get("carl@example.com"), Some(&AlbumRole::Editor));
    }

    #[test]
    fn test_columns_may_be_reordered() {
        let states = parse(
            "Role;User 1;AlbumId;AlbumName\n\
             viewer;ann@example.com;a1;Summer\n",
        )
        .unwrap();

        assert_eq!(states[0].album_name, "Summer");
        assert_eq!(states[0].users(), users(&["ann@example.com"]));
    }

    #[test]
    fn test_read_from_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("albums.csv");
        std::fs::write(&path, "AlbumName;AlbumId;Role;User 1\nSummer;a1;viewer;ann@example.com\n")
            .expect("Failed to write table");

        let states = read_desired_states(&path).unwrap();
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let err = read_desired_states(&dir.path().join("nope.csv")).unwrap_err();

        assert!(matches!(
            err,
            AlbumShareError::Table(TableError::FileNotFound { .. })
        ));
        assert!(err.is_fatal());
    }
}
