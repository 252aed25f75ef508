//! Structured-document query collaborator
//!
//! Seam for the document engine that backs structured assertions:
//! - `DocumentQuery` parses a body and evaluates a selector expression
//! - `HtmlDocumentQuery` is the scraper-backed implementation, accepting
//!   XPath-style location paths (`//tag/text()`, `//tag/@attr`) as well as
//!   raw CSS selectors
//! - A mock stands in when the `html-query` feature is disabled

/// Errors from selector parsing or document evaluation.
///
/// These are genuine faults of the query engine; the checker converts them
/// into diagnostic strings rather than propagating them.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid selector {expr}: {detail}")]
    Selector { expr: String, detail: String },
    #[error("document evaluation failed: {0}")]
    Evaluation(String),
}

/// Parses text as a structured document and evaluates a selector expression
/// against it, returning the first scalar result in document order.
pub trait DocumentQuery: Send + Sync {
    /// Evaluate `expr` against `body`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - first result of the expression
    /// * `Ok(None)` - expression is valid but matched nothing
    /// * `Err(QueryError)` - expression or document could not be evaluated
    fn query_first(&self, body: &str, expr: &str) -> Result<Option<String>, QueryError>;
}

/// What a query extracts from matched elements
#[cfg(feature = "html-query")]
#[derive(Debug, Clone, PartialEq, Eq)]
enum Extract {
    /// Concatenated text content
    Text,
    /// A named attribute value
    Attr(String),
}

/// A selector expression lowered to a CSS selector plus an extraction step
#[cfg(feature = "html-query")]
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryPlan {
    selector: String,
    extract: Extract,
}

#[cfg(feature = "html-query")]
impl QueryPlan {
    /// Lower an expression to a plan.
    ///
    /// Expressions starting with `//` are treated as XPath-style location
    /// paths over element steps, with optional `[@attr='v']` predicates and a
    /// trailing `/text()` or `/@attr` extraction. Anything else passes
    /// through as a CSS selector extracting text.
    fn parse(expr: &str) -> Result<Self, QueryError> {
        let trimmed = expr.trim();
        let Some(path) = trimmed.strip_prefix("//") else {
            return Ok(Self {
                selector: trimmed.to_string(),
                extract: Extract::Text,
            });
        };

        let (path, extract) = if let Some(stripped) = path.strip_suffix("/text()") {
            (stripped, Extract::Text)
        } else if let Some(at) = path.rfind("/@") {
            (&path[..at], Extract::Attr(path[at + 2..].to_string()))
        } else {
            (path, Extract::Text)
        };

        let mut selector = String::new();
        for step in path.split('/').filter(|s| !s.is_empty()) {
            if !selector.is_empty() {
                selector.push(' ');
            }
            selector.push_str(&translate_step(expr, step)?);
        }
        if selector.is_empty() {
            return Err(QueryError::Selector {
                expr: expr.to_string(),
                detail: "empty location path".to_string(),
            });
        }
        Ok(Self { selector, extract })
    }
}

/// Translate one location step (`tag` or `tag[@attr='v']` or `tag[@attr]`)
/// into its CSS equivalent
#[cfg(feature = "html-query")]
fn translate_step(expr: &str, step: &str) -> Result<String, QueryError> {
    let Some(open) = step.find('[') else {
        return Ok(step.to_string());
    };
    let tag = &step[..open];
    let predicate = &step[open..];
    let inner = predicate
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .and_then(|p| p.strip_prefix('@'))
        .ok_or_else(|| QueryError::Selector {
            expr: expr.to_string(),
            detail: format!("unsupported predicate in step {}", step),
        })?;

    match inner.split_once('=') {
        Some((name, value)) => {
            let value = value.trim_matches(|c| c == '\'' || c == '"');
            Ok(format!("{}[{}=\"{}\"]", tag, name, value))
        }
        None => Ok(format!("{}[{}]", tag, inner)),
    }
}

/// Production document query implementation backed by scraper's HTML parser
#[cfg(feature = "html-query")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentQuery;

#[cfg(feature = "html-query")]
impl HtmlDocumentQuery {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "html-query")]
impl DocumentQuery for HtmlDocumentQuery {
    fn query_first(&self, body: &str, expr: &str) -> Result<Option<String>, QueryError> {
        let plan = QueryPlan::parse(expr)?;
        let selector =
            scraper::Selector::parse(&plan.selector).map_err(|e| QueryError::Selector {
                expr: expr.to_string(),
                detail: e.to_string(),
            })?;

        let document = scraper::Html::parse_document(body);
        for element in document.select(&selector) {
            match &plan.extract {
                Extract::Text => {
                    let text: String = element.text().collect();
                    // An element with no text node is not a text() match
                    if !text.is_empty() {
                        return Ok(Some(text));
                    }
                }
                Extract::Attr(name) => {
                    if let Some(value) = element.value().attr(name) {
                        return Ok(Some(value.to_string()));
                    }
                }
            }
        }
        Ok(None)
    }
}

/// Mock document query implementation when the `html-query` feature is
/// disabled: every expression is valid and matches nothing.
#[cfg(not(feature = "html-query"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDocumentQuery;

#[cfg(not(feature = "html-query"))]
impl MockDocumentQuery {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(feature = "html-query"))]
impl DocumentQuery for MockDocumentQuery {
    fn query_first(&self, _body: &str, _expr: &str) -> Result<Option<String>, QueryError> {
        Ok(None)
    }
}
