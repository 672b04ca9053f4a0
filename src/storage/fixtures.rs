// Sample store shared by the storage, catalog and search tests
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const FIXTURE_SQL: &str = r#"
CREATE TABLE books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT,
    published TEXT,
    price REAL
);
INSERT INTO books (id, title, author, published, price) VALUES
    (1, 'The Great Gatsby', 'F. Scott Fitzgerald', '1925-04-10', 12.5),
    (2, 'Invisible Man', 'Ralph Ellison', '1952-04-14 09:30:00', 15.0),
    (3, 'The Great Railway Bazaar', 'Paul Theroux', '1975-01-01', 9.99);
CREATE VIRTUAL TABLE books_fts USING fts4(title, author, published);
INSERT INTO books_fts (rowid, title, author, published)
    SELECT id, title, author, published FROM books;

CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    item TEXT NOT NULL,
    note TEXT,
    created_at TEXT NOT NULL
);
INSERT INTO orders (id, item, note, created_at) VALUES
    (1, 'desk lamp', NULL, '2023-01-05T10:00:00'),
    (2, 'reading lamp', 'gift wrap', '2024-03-01T08:15:00'),
    (3, 'bookshelf', NULL, '2022-11-20T17:45:00');
CREATE VIRTUAL TABLE orders_fts USING fts4(item, note, created_at);
INSERT INTO orders_fts (rowid, item, note, created_at)
    SELECT id, item, note, created_at FROM orders;

CREATE TABLE products (
    name TEXT NOT NULL,
    price REAL,
    sku INTEGER
);
INSERT INTO products (name, price, sku) VALUES
    ('lamp', 19.5, 1001),
    ('chair', 45, 1002);
CREATE VIRTUAL TABLE products_fts USING fts4(name);
INSERT INTO products_fts (rowid, name) SELECT rowid, name FROM products;

CREATE VIRTUAL TABLE ghosts_fts USING fts4(body);
"#;

/// Create the sample store inside `dir` and return its path
pub fn create_store(dir: &Path) -> PathBuf {
    let db_path = dir.join("search.db");
    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(FIXTURE_SQL).unwrap();
    db_path
}
