//! In-memory store
//!
//! One table per entity behind a single lock. The link table is keyed by
//! `(author_id, book_id)` and iterates in key order, not in `order` order.
//! Deletes cascade the same way the SQL schema does.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorBook, Book, Comment},
};

use super::{AuthorsRepository, BooksRepository, CommentsRepository};

#[derive(Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    comments: BTreeMap<i32, Comment>,
    links: BTreeMap<(i32, i32), AuthorBook>,
    last_author_id: i32,
    last_book_id: i32,
    last_comment_id: i32,
}

impl Tables {
    fn links_of_book(&self, book_id: i32) -> impl Iterator<Item = &AuthorBook> + '_ {
        self.links.values().filter(move |l| l.book_id == book_id)
    }

    fn replace_links(&mut self, book_id: i32, links: &[AuthorBook]) -> AppResult<()> {
        if let Some(missing) = links.iter().find(|l| !self.authors.contains_key(&l.author_id)) {
            return Err(AppError::Internal(format!(
                "link references missing author {}",
                missing.author_id
            )));
        }
        self.links.retain(|&(_, b), _| b != book_id);
        for link in links {
            let row = AuthorBook {
                author_id: link.author_id,
                book_id,
                order: link.order,
                author: None,
                book: None,
            };
            // a repeated author would collide on the key
            if self.links.insert((link.author_id, book_id), row).is_some() {
                return Err(AppError::Internal(format!(
                    "author {} linked twice to book {}",
                    link.author_id, book_id
                )));
            }
        }
        Ok(())
    }
}

/// Volatile store implementing every repository trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

/// Stored rows never carry navigation collections
fn bare_author(author: &Author) -> Author {
    Author {
        id: author.id,
        name: author.name.clone(),
        books: None,
    }
}

fn bare_book(book: &Book) -> Book {
    Book {
        id: book.id,
        title: book.title.clone(),
        publication_date: book.publication_date,
        comments: None,
        authors: None,
    }
}

#[async_trait]
impl AuthorsRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let t = self.tables.read().await;
        Ok(t.authors.values().cloned().collect())
    }

    async fn get_with_books(&self, id: i32) -> AppResult<Option<Author>> {
        let t = self.tables.read().await;
        let Some(author) = t.authors.get(&id) else {
            return Ok(None);
        };

        let books = t
            .links
            .range((id, i32::MIN)..=(id, i32::MAX))
            .map(|(_, link)| AuthorBook {
                book: t.books.get(&link.book_id).cloned(),
                ..link.clone()
            })
            .collect();

        Ok(Some(Author {
            books: Some(books),
            ..author.clone()
        }))
    }

    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Author>> {
        let needle = fragment.to_lowercase();
        let t = self.tables.read().await;
        let mut found: Vec<Author> = t
            .authors
            .values()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.read().await.authors.contains_key(&id))
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let t = self.tables.read().await;
        Ok(t
            .authors
            .values()
            .any(|a| a.name == name && Some(a.id) != exclude_id))
    }

    async fn existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let t = self.tables.read().await;
        let mut found: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| t.authors.contains_key(id))
            .collect();
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    async fn create(&self, author: &Author) -> AppResult<Author> {
        let mut t = self.tables.write().await;
        t.last_author_id += 1;
        let row = Author {
            id: t.last_author_id,
            ..bare_author(author)
        };
        t.authors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, author: &Author) -> AppResult<()> {
        let mut t = self.tables.write().await;
        let row = t
            .authors
            .get_mut(&author.id)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", author.id)))?;
        row.name = author.name.clone();
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.authors.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        t.links.retain(|&(a, _), _| a != id);
        Ok(())
    }
}

#[async_trait]
impl BooksRepository for MemoryStore {
    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn get_with_authors(&self, id: i32) -> AppResult<Option<Book>> {
        let t = self.tables.read().await;
        let Some(book) = t.books.get(&id) else {
            return Ok(None);
        };

        let authors = t
            .links_of_book(id)
            .map(|link| AuthorBook {
                author: t.authors.get(&link.author_id).cloned(),
                ..link.clone()
            })
            .collect();

        Ok(Some(Book {
            authors: Some(authors),
            ..book.clone()
        }))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.read().await.books.contains_key(&id))
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        let mut t = self.tables.write().await;
        let id = t.last_book_id + 1;

        // links first so a bad link leaves nothing behind
        if let Some(links) = &book.authors {
            let snapshot = t.links.clone();
            if let Err(e) = t.replace_links(id, links) {
                t.links = snapshot;
                return Err(e);
            }
        }

        t.last_book_id = id;
        let row = Book {
            id,
            ..bare_book(book)
        };
        t.books.insert(id, row.clone());

        Ok(Book {
            authors: book.authors.as_ref().map(|links| {
                links
                    .iter()
                    .map(|l| AuthorBook {
                        book_id: id,
                        ..l.clone()
                    })
                    .collect()
            }),
            ..row
        })
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.books.contains_key(&book.id) {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }

        if let Some(links) = &book.authors {
            let snapshot = t.links.clone();
            if let Err(e) = t.replace_links(book.id, links) {
                t.links = snapshot;
                return Err(e);
            }
        }

        t.books.insert(book.id, bare_book(book));
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.books.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        t.links.retain(|&(_, b), _| b != id);
        t.comments.retain(|_, c| c.book_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentsRepository for MemoryStore {
    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Comment>> {
        let t = self.tables.read().await;
        Ok(t
            .comments
            .values()
            .filter(|c| c.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn create(&self, comment: &Comment) -> AppResult<Comment> {
        let mut t = self.tables.write().await;
        if !t.books.contains_key(&comment.book_id) {
            return Err(AppError::Internal(format!(
                "comment references missing book {}",
                comment.book_id
            )));
        }
        t.last_comment_id += 1;
        let row = Comment {
            id: t.last_comment_id,
            ..comment.clone()
        };
        t.comments.insert(row.id, row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_authors(store: &MemoryStore, names: &[&str]) -> Vec<i32> {
        let mut ids = Vec::new();
        for name in names {
            let author = AuthorsRepository::create(
                store,
                &Author {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            ids.push(author.id);
        }
        ids
    }

    fn book_with_links(title: &str, links: &[(i32, i32)]) -> Book {
        Book {
            title: title.to_string(),
            authors: Some(
                links
                    .iter()
                    .map(|&(author_id, order)| AuthorBook {
                        order,
                        ..AuthorBook::for_author(author_id)
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_links_come_back_in_key_order() {
        let store = MemoryStore::default();
        let ids = seed_authors(&store, &["A", "B", "C"]).await;

        let book = BooksRepository::create(&store, &book_with_links("T", &[(ids[2], 0), (ids[0], 1)]))
            .await
            .unwrap();
        let loaded = store.get_with_authors(book.id).await.unwrap().unwrap();
        let links = loaded.authors.unwrap();

        assert_eq!(links.iter().map(|l| l.author_id).collect::<Vec<_>>(), [ids[0], ids[2]]);
        assert_eq!(links[0].author.as_ref().unwrap().name, "A");
        assert_eq!(links[1].order, 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_author_leaves_nothing() {
        let store = MemoryStore::default();
        let ids = seed_authors(&store, &["A"]).await;

        let result = BooksRepository::create(&store, &book_with_links("T", &[(ids[0], 0), (99, 1)])).await;
        assert!(result.is_err());
        assert!(!BooksRepository::exists(&store, 1).await.unwrap());
        assert!(store.tables.read().await.links.is_empty());
    }

    #[tokio::test]
    async fn test_update_without_links_keeps_links() {
        let store = MemoryStore::default();
        let ids = seed_authors(&store, &["A"]).await;
        let book = BooksRepository::create(&store, &book_with_links("T", &[(ids[0], 0)]))
            .await
            .unwrap();

        BooksRepository::update(
            &store,
            &Book {
                id: book.id,
                title: "Renamed".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let loaded = store.get_with_authors(book.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.authors.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deletes_cascade() {
        let store = MemoryStore::default();
        let ids = seed_authors(&store, &["A", "B"]).await;
        let book = BooksRepository::create(&store, &book_with_links("T", &[(ids[0], 0), (ids[1], 1)]))
            .await
            .unwrap();
        CommentsRepository::create(
            &store,
            &Comment {
                body: "nice".into(),
                book_id: book.id,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        AuthorsRepository::delete(&store, ids[0]).await.unwrap();
        let loaded = store.get_with_authors(book.id).await.unwrap().unwrap();
        assert_eq!(loaded.authors.unwrap().len(), 1);

        BooksRepository::delete(&store, book.id).await.unwrap();
        let t = store.tables.read().await;
        assert!(t.links.is_empty());
        assert!(t.comments.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = MemoryStore::default();
        seed_authors(&store, &["Gabriel García Márquez", "Gabriela Mistral", "Borges"]).await;

        let found = store.search_by_name("gabriel").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(store.search_by_name("xyz").await.unwrap().is_empty());
    }
}
