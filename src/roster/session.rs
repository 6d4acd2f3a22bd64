use super::filter::{filter_table, FilterQuery};
use super::table::GuestTable;
use std::fmt;

/// One user's slot: the current guest table (if any) and the last query.
/// `table == None` is the state before any upload and after a reset; the
/// only way back out of a loaded table is an explicit reset or a
/// replacing upload.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    table: Option<GuestTable>,
    query: FilterQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Search invoked before any guest list was loaded.
    NotLoaded,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotLoaded => write!(f, "no guest list loaded in this session"),
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionState {
    /// Installs a freshly sanitized table, replacing any previous one and
    /// clearing the stored query.
    pub fn load(&mut self, table: GuestTable) {
        self.table = Some(table);
        self.query = FilterQuery::default();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&GuestTable> {
        self.table.as_ref()
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Remembers the query and returns the matching subset of the loaded
    /// table.
    pub fn search(&mut self, query: FilterQuery) -> Result<GuestTable, SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NotLoaded)?;
        let result = filter_table(table, &query);
        self.query = query;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_session() -> SessionState {
        let mut session = SessionState::default();
        session.load(GuestTable::new(
            vec!["Name".into()],
            vec![vec!["Ann Lee".into()], vec!["Bo Chen".into()]],
        ));
        session
    }

    #[test]
    fn search_before_load_is_rejected() {
        let mut session = SessionState::default();
        assert_eq!(
            session.search(FilterQuery::default()),
            Err(SessionError::NotLoaded)
        );
    }

    #[test]
    fn search_remembers_the_query() {
        let mut session = loaded_session();
        let query = FilterQuery {
            name: "bo".into(),
            ..FilterQuery::default()
        };
        let result = session.search(query.clone()).expect("loaded");
        assert_eq!(result.len(), 1);
        assert_eq!(session.query(), &query);
    }

    #[test]
    fn reset_returns_to_no_data() {
        let mut session = loaded_session();
        session.reset();
        assert!(!session.is_loaded());
        assert!(session.query().is_blank());
    }

    #[test]
    fn load_replaces_table_and_clears_query() {
        let mut session = loaded_session();
        session
            .search(FilterQuery {
                name: "ann".into(),
                ..FilterQuery::default()
            })
            .expect("loaded");

        session.load(GuestTable::new(
            vec!["Name".into()],
            vec![vec!["Caro Diaz".into()]],
        ));
        assert!(session.query().is_blank());
        assert_eq!(session.table().map(GuestTable::len), Some(1));
    }
}
