//! Tantivy-based full-text index of page content.

use crate::summary::SummaryRecord;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use thiserror::Error;

/// Memory budget for the index writer
const WRITER_HEAP_BYTES: usize = 50_000_000;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("index error: {0}")]
    IndexError(#[from] tantivy::TantivyError),
    #[error("query parse error: {0}")]
    QueryError(#[from] tantivy::query::QueryParserError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("index writer is unavailable")]
    WriterPoisoned,
}

/// A matching page
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub score: f32,
}

#[derive(Debug, Clone, Copy)]
struct Fields {
    url: Field,
    title: Field,
    full_text: Field,
}

/// Tantivy-based search index holding the full text of each page.
pub struct SearchIndex {
    index: Index,
    fields: Fields,
    writer: Mutex<IndexWriter>,
}

impl SearchIndex {
    /// Open or create a search index at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let mut schema_builder = Schema::builder();
        let fields = Fields {
            url: schema_builder.add_text_field("url", STRING | STORED),
            title: schema_builder.add_text_field("title", TEXT | STORED),
            full_text: schema_builder.add_text_field("full_text", TEXT | STORED),
        };
        let schema = schema_builder.build();

        let index_path = path.as_ref();
        std::fs::create_dir_all(index_path)?;

        let index = Index::create_in_dir(index_path, schema.clone())
            .or_else(|_| Index::open_in_dir(index_path))?;
        let writer = index.writer(WRITER_HEAP_BYTES)?;

        Ok(Self {
            index,
            fields,
            writer: Mutex::new(writer),
        })
    }

    /// Index a record's full text, replacing any earlier entry for the URL
    pub fn index_record(&self, record: &SummaryRecord) -> Result<(), SearchError> {
        let mut writer = self.writer.lock().map_err(|_| SearchError::WriterPoisoned)?;

        let Fields {
            url,
            title,
            full_text,
        } = self.fields;

        writer.delete_term(Term::from_field_text(url, &record.url));
        writer.add_document(doc!(
            url => record.url.as_str(),
            title => record.title.as_str(),
            full_text => record.full_text.as_str(),
        ))?;

        writer.commit()?;
        Ok(())
    }

    /// Remove the entry for a URL
    pub fn delete(&self, url: &str) -> Result<(), SearchError> {
        let mut writer = self.writer.lock().map_err(|_| SearchError::WriterPoisoned)?;
        writer.delete_term(Term::from_field_text(self.fields.url, url));
        writer.commit()?;
        Ok(())
    }

    /// Search titles and page text for the query
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;
        let searcher = reader.searcher();

        let query_parser =
            QueryParser::for_index(&self.index, vec![self.fields.title, self.fields.full_text]);
        let query = query_parser.parse_query(query_str)?;

        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut results = Vec::new();
        for (score, doc_address) in top_docs {
            let retrieved_doc = searcher.doc::<TantivyDocument>(doc_address)?;
            let text_of = |field| {
                retrieved_doc
                    .get_first(field)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            results.push(SearchHit {
                url: text_of(self.fields.url),
                title: text_of(self.fields.title),
                score,
            });
        }

        Ok(results)
    }

    /// Number of indexed pages
    pub fn count(&self) -> Result<u64, SearchError> {
        let reader = self.index.reader()?;
        Ok(reader.searcher().num_docs())
    }
}
