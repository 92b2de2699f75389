use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Params, Row};

use super::{BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookId};

const BOOK_SELECT_SQL: &str = "SELECT id, author, title, published FROM book";

// AUTOINCREMENT keeps ids of deleted rows from being handed out again.
const BOOK_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS book (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        author    TEXT,
        title     TEXT,
        published INTEGER NOT NULL CHECK (published IN (0, 1))
    );
    CREATE INDEX IF NOT EXISTS book_author_published ON book (author, published);
    CREATE INDEX IF NOT EXISTS book_published ON book (published);
";

/// SQLite-backed book store.
pub struct SqliteBookStore {
    conn: Mutex<Connection>,
}

impl SqliteBookStore {
    /// Wrap an open connection, creating the `book` table if it is missing.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(BOOK_TABLE_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_books<P: Params>(&self, filter: &str, params: P) -> StoreResult<Vec<Book>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} {filter} ORDER BY id"))?;
        let books = stmt
            .query_map(params, parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }
}

impl BookStore for SqliteBookStore {
    fn insert(&self, book: &Book) -> StoreResult<BookId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO book (author, title, published) VALUES (?1, ?2, ?3)",
            params![book.author, book.title, book.published],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        let mut books = self.query_books("WHERE id = ?1", params![id])?;
        Ok(books.pop())
    }

    fn get_all(&self) -> StoreResult<Vec<Book>> {
        self.query_books("", [])
    }

    fn update(&self, book: &Book) -> StoreResult<bool> {
        let Some(id) = book.id else {
            return Ok(false);
        };

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE book SET author = ?1, title = ?2, published = ?3 WHERE id = ?4",
            params![book.author, book.title, book.published, id],
        )?;
        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: BookId) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM book WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn find_by_author(&self, author: &str) -> StoreResult<Vec<Book>> {
        self.query_books("WHERE author = ?1", params![author])
    }

    fn find_by_published(&self, published: bool) -> StoreResult<Vec<Book>> {
        self.query_books("WHERE published = ?1", params![published])
    }

    fn find_by_author_and_published(
        &self,
        author: &str,
        published: bool,
    ) -> StoreResult<Vec<Book>> {
        self.query_books(
            "WHERE author = ?1 AND published = ?2",
            params![author, published],
        )
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: Some(row.get(0)?),
        author: row.get(1)?,
        title: row.get(2)?,
        published: row.get(3)?,
    })
}
