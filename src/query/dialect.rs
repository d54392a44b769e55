//! Catalog SQL is written for MySQL. DuckDB runs nearly all of it unchanged;
//! the one construct it rejects is rewritten here into an equivalent query.
//!
//! MySQL evaluates `HAVING` on a query without `GROUP BY` as a filter over the
//! projected rows, so the condition may name select-list aliases. DuckDB
//! binds such a query as an aggregate and fails. Wrapping the query and moving
//! the condition into an outer `WHERE` yields the same rows and columns.

use std::borrow::Cow;

/// Upper-cased words that sit outside parentheses and quoted text, with their
/// byte offsets.
fn top_level_words(sql: &str) -> Vec<(usize, String)> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut word_start: Option<usize> = None;

    let mut flush = |start: Option<usize>, end: usize, depth: usize| {
        if let Some(start) = start {
            if depth == 0 {
                words.push((start, sql[start..end].to_ascii_uppercase()));
            }
        }
    };

    for (i, c) in sql.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            word_start.get_or_insert(i);
            continue;
        }
        flush(word_start.take(), i, depth);
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    flush(word_start, sql.len(), depth);
    words
}

/// `sql` in a form DuckDB accepts with MySQL's meaning.
///
/// Only a single `SELECT ... HAVING <cond>` without `GROUP BY`, whose
/// condition calls no function, is rewritten; everything else is returned
/// untouched.
pub fn duckdb_compatible(sql: &str) -> Cow<'_, str> {
    let words = top_level_words(sql);
    let position = |keyword: &str| {
        words
            .iter()
            .find(|(_, w)| w == keyword)
            .map(|(i, _)| *i)
    };

    let Some(having) = position("HAVING") else {
        return Cow::Borrowed(sql);
    };
    if ["GROUP", "UNION", "INTERSECT", "EXCEPT"]
        .iter()
        .any(|kw| position(kw).is_some())
    {
        return Cow::Borrowed(sql);
    }

    let body = sql.trim_end().trim_end_matches(';').trim_end();
    let condition_end = words
        .iter()
        .find(|(i, w)| *i > having && matches!(w.as_str(), "ORDER" | "LIMIT" | "OFFSET"))
        .map_or(body.len(), |(i, _)| *i)
        .min(body.len());

    let condition = body[having + "HAVING".len()..condition_end].trim();
    if condition.is_empty() || condition.contains('(') {
        return Cow::Borrowed(sql);
    }

    let select = body[..having].trim_end();
    let tail = body[condition_end..].trim();
    let mut adapted = format!("SELECT * FROM ({select}) AS having_rows WHERE {condition}");
    if !tail.is_empty() {
        adapted.push(' ');
        adapted.push_str(tail);
    }
    adapted.push(';');
    Cow::Owned(adapted)
}
