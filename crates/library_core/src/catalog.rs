//! crates/library_core/src/catalog.rs
//!
//! Catalog operations: adding, searching, patching and removing books,
//! and the stock counter they all guard.

use crate::domain::{Book, BookPatch, BookSpec, SearchField};
use crate::error::{LibraryError, LibraryResult};
use crate::library::Library;
use crate::ports::IdProvider;

impl Library {
    /// Adds a book to the catalog.
    ///
    /// Titles are unique case-insensitively; the entry receives the next
    /// sequential id and a generated ISBN.
    pub fn add_book(&mut self, spec: BookSpec, ids: &dyn IdProvider) -> LibraryResult<Book> {
        let lowered = spec.title.to_lowercase();
        if self.books.iter().any(|b| b.title.to_lowercase() == lowered) {
            return Err(LibraryError::DuplicateTitle(spec.title));
        }

        let next_id = self.books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let book = Book {
            id: next_id,
            title: spec.title,
            author: spec.author,
            year: spec.year,
            genre: spec.genre,
            pages: spec.pages,
            isbn: ids.isbn13(),
            rating: spec.rating,
            language: spec.language,
            stock: spec.stock,
            price: spec.price,
        };
        self.books.push(book.clone());
        Ok(book)
    }

    /// Returns every book whose chosen field contains `query` as a
    /// case-insensitive substring.
    pub fn find_books(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                let haystack = match field {
                    SearchField::Title => &b.title,
                    SearchField::Author => &b.author,
                    SearchField::Genre => &b.genre,
                    SearchField::Language => &b.language,
                };
                haystack.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// First catalog entry whose title contains `title` case-insensitively.
    /// This is the lookup the issue/update/remove/purchase flows use.
    pub fn match_book(&self, title: &str) -> Option<&Book> {
        let needle = title.to_lowercase();
        self.books.iter().find(|b| b.title.to_lowercase().contains(&needle))
    }

    fn match_book_position(&self, title: &str) -> Option<usize> {
        let needle = title.to_lowercase();
        self.books.iter().position(|b| b.title.to_lowercase().contains(&needle))
    }

    /// Adjusts the stock counter of a matching book by `delta`, failing
    /// before any change if the result would be negative.
    pub fn adjust_stock(&mut self, title: &str, delta: i64) -> LibraryResult<u32> {
        let pos = self
            .match_book_position(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
        let book = &mut self.books[pos];
        let adjusted = i64::from(book.stock) + delta;
        if adjusted < 0 {
            return Err(LibraryError::StockUnderflow(book.title.clone()));
        }
        book.stock = adjusted as u32;
        Ok(book.stock)
    }

    /// Applies a partial update to a matching book. A patched title must
    /// not collide with another entry.
    pub fn update_book(&mut self, title: &str, patch: BookPatch) -> LibraryResult<Book> {
        let pos = self
            .match_book_position(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;

        if let Some(new_title) = &patch.title {
            let lowered = new_title.to_lowercase();
            let collides = self
                .books
                .iter()
                .enumerate()
                .any(|(i, b)| i != pos && b.title.to_lowercase() == lowered);
            if collides {
                return Err(LibraryError::DuplicateTitle(new_title.clone()));
            }
        }

        let book = &mut self.books[pos];
        if let Some(v) = patch.title {
            book.title = v;
        }
        if let Some(v) = patch.author {
            book.author = v;
        }
        if let Some(v) = patch.year {
            book.year = v;
        }
        if let Some(v) = patch.genre {
            book.genre = v;
        }
        if let Some(v) = patch.pages {
            book.pages = v;
        }
        if let Some(v) = patch.isbn {
            book.isbn = v;
        }
        if let Some(v) = patch.rating {
            book.rating = v;
        }
        if let Some(v) = patch.language {
            book.language = v;
        }
        if let Some(v) = patch.stock {
            book.stock = v;
        }
        if let Some(v) = patch.price {
            book.price = v;
        }
        Ok(book.clone())
    }

    /// Removes a matching book, unless any copy of it is still out on loan.
    pub fn remove_book(&mut self, title: &str) -> LibraryResult<Book> {
        let pos = self
            .match_book_position(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
        let exact_title = self.books[pos].title.clone();

        let issued = self
            .loans
            .iter()
            .any(|l| l.book_title == exact_title && l.status == crate::domain::LoanStatus::Issued);
        if issued {
            return Err(LibraryError::BookInUse(exact_title));
        }

        Ok(self.books.remove(pos))
    }
}
