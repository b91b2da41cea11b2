use crate::{ast::TermRef, error::QueryError, query::Clause};

/// Paging window read from `limit`, `offset`, `page`, `pagenum`, `pagesize`
/// and `after` terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    limit: Option<u64>,
    offset: Option<u64>,
    page_num: Option<u64>,
    page_size: Option<u64>,
    after: Option<String>,
}

impl Page {
    pub fn from_clause(clause: &Clause) -> Result<Self, QueryError> {
        let mut page = Page::default();

        for term in clause.terms() {
            let function = term.token().to_lowercase();
            match function.as_str() {
                "limit" => {
                    page.limit = Some(number_arg(&term, 0)?);
                    if term.len() > 1 {
                        page.offset = Some(number_arg(&term, 1)?);
                    }
                }
                "offset" => page.offset = Some(number_arg(&term, 0)?),
                "page" => {
                    page.page_num = Some(page_number(&term, 0)?);
                    if term.len() > 1 {
                        page.page_size = Some(number_arg(&term, 1)?);
                    }
                }
                "pagenum" => page.page_num = Some(page_number(&term, 0)?),
                "pagesize" => page.page_size = Some(number_arg(&term, 0)?),
                "after" => {
                    let cursor = term.get_term(0).ok_or_else(|| invalid(&term, ""))?;
                    page.after = Some(cursor.dequoted().to_string());
                }
                _ => return Err(QueryError::UnknownFunction(term.token().to_string())),
            }
        }
        Ok(page)
    }

    /// Row limit: an explicit `limit`, otherwise the page size.
    pub fn limit(&self) -> Option<u64> {
        self.limit.or(self.page_size)
    }

    /// Rows to skip: an explicit offset, otherwise `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        match (self.offset, self.page_num, self.limit()) {
            (Some(offset), _, _) => offset,
            (None, Some(page), Some(limit)) => (page - 1).saturating_mul(limit),
            _ => 0,
        }
    }

    /// One-based page number, derived from the offset when not given.
    pub fn page_num(&self) -> u64 {
        match (self.page_num, self.limit()) {
            (Some(page), _) => page,
            (None, Some(limit)) if limit > 0 => self.offset() / limit + 1,
            _ => 1,
        }
    }

    /// Keyset cursor from `after(...)`.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

fn invalid(term: &TermRef<'_>, value: &str) -> QueryError {
    QueryError::InvalidValue {
        function: term.token().to_string(),
        value: value.to_string(),
    }
}

fn number_arg(term: &TermRef<'_>, index: usize) -> Result<u64, QueryError> {
    let arg = term.get_term(index).ok_or_else(|| invalid(term, ""))?;
    if !arg.is_leaf() {
        return Err(invalid(term, &arg.to_string()));
    }
    arg.literal()
        .as_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| invalid(term, arg.token()))
}

fn page_number(term: &TermRef<'_>, index: usize) -> Result<u64, QueryError> {
    match number_arg(term, index)? {
        0 => Err(invalid(term, "0")),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rql: &str) -> Result<Page, QueryError> {
        let mut clause = Clause::new("page");
        clause.parse(rql)?;
        Page::from_clause(&clause)
    }

    #[test]
    fn test_page_and_size() {
        let p = page("page(3,25)").unwrap();
        assert_eq!(p.limit(), Some(25));
        assert_eq!(p.offset(), 50);
        assert_eq!(p.page_num(), 3);
    }

    #[test]
    fn test_limit_with_offset() {
        let p = page("limit(10,40)").unwrap();
        assert_eq!(p.limit(), Some(10));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page_num(), 5);
    }

    #[test]
    fn test_defaults() {
        let p = page("").unwrap();
        assert_eq!(p.limit(), None);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page_num(), 1);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(page("limit(ten)"), Err(QueryError::InvalidValue { .. })));
        assert!(matches!(page("limit(-1)"), Err(QueryError::InvalidValue { .. })));
        assert!(matches!(page("page(0)"), Err(QueryError::InvalidValue { .. })));
        assert!(matches!(page("limit()"), Err(QueryError::InvalidValue { .. })));
    }

    #[test]
    fn test_after_cursor() {
        let p = page("after('abc,1')").unwrap();
        assert_eq!(p.after(), Some("abc,1"));
    }
}
