//! Line-oriented input feed of documents and queries.
//!
//! The feed consists of the number of documents `N`, `N` documents (one per line),
//! the number of queries `Q`, and `Q` queries of the form `<doc_id> <max_distance>`:
//!
//! ```text
//! 3
//! a b c
//! a b c
//! x y z
//! 2
//! 0 0
//! 2 -1
//! ```
//!
//! Every line is trimmed, and blank lines are skipped.
use crate::errors::{NearDupError, Result};

/// Documents and queries read from an input feed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feed {
    documents: Vec<String>,
    queries: Vec<(usize, i64)>,
}

impl Feed {
    /// Parses a feed.
    ///
    /// # Errors
    ///
    /// * [`NearDupError::Format`] is returned if a count or a query line is malformed,
    ///   or if fewer documents or queries are given than announced.
    /// * [`NearDupError::Range`] is returned if a query refers to a document id
    ///   out of `[0, N)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use near_dup::feed::Feed;
    ///
    /// let feed = Feed::parse("2\nhello world\nhello world\n1\n0 0\n").unwrap();
    /// assert_eq!(feed.documents(), &["hello world", "hello world"]);
    /// assert_eq!(feed.queries(), &[(0, 0)]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let end = input.lines().count() + 1;
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line, text) = lines
            .next()
            .ok_or_else(|| NearDupError::format(end, "missing the number of documents"))?;
        let num_docs = parse_count(line, text, "the number of documents")?;

        let mut documents = vec![];
        for _ in 0..num_docs {
            let (_, text) = lines.next().ok_or_else(|| {
                NearDupError::format(
                    end,
                    format!("expected {num_docs} documents, found {}", documents.len()),
                )
            })?;
            documents.push(text.to_string());
        }

        let (line, text) = lines
            .next()
            .ok_or_else(|| NearDupError::format(end, "missing the number of queries"))?;
        let num_queries = parse_count(line, text, "the number of queries")?;

        let mut queries = vec![];
        for _ in 0..num_queries {
            let (line, text) = lines.next().ok_or_else(|| {
                NearDupError::format(
                    end,
                    format!("expected {num_queries} queries, found {}", queries.len()),
                )
            })?;
            queries.push(parse_query(line, text, num_docs)?);
        }

        if let Some((line, _)) = lines.next() {
            tracing::warn!("Ignored trailing input from line {line}.");
        }

        Ok(Self { documents, queries })
    }

    /// Gets the documents.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Gets the queries as pairs of a document id and a maximum distance.
    pub fn queries(&self) -> &[(usize, i64)] {
        &self.queries
    }

    /// Splits into the documents and the queries.
    pub fn into_parts(self) -> (Vec<String>, Vec<(usize, i64)>) {
        (self.documents, self.queries)
    }
}

fn parse_count(line: usize, text: &str, what: &str) -> Result<usize> {
    text.parse().map_err(|_| {
        NearDupError::format(
            line,
            format!("expected {what} as a non-negative integer, found {text:?}"),
        )
    })
}

fn parse_query(line: usize, text: &str, num_docs: usize) -> Result<(usize, i64)> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(NearDupError::format(
            line,
            format!("expected a query of two integers, found {text:?}"),
        ));
    }
    let parse_int = |field: &str| {
        field.parse::<i64>().map_err(|_| {
            NearDupError::format(line, format!("expected an integer, found {field:?}"))
        })
    };
    let doc_id = parse_int(fields[0])?;
    let max_distance = parse_int(fields[1])?;
    match usize::try_from(doc_id) {
        Ok(id) if id < num_docs => Ok((id, max_distance)),
        _ => Err(NearDupError::range(doc_id, num_docs)),
    }
}
