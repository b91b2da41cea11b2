//! Documentation content for the rql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Quoting,
    Operators,
    Functions,
    Paging,
    Validation,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "quoting" | "quotes" | "escaping" | "escapes" => Some(Self::Quoting),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "fns" => Some(Self::Functions),
            "paging" | "page" | "sorting" | "sort" => Some(Self::Paging),
            "validation" | "columns" => Some(Self::Validation),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"RQL DOCUMENTATION

RQL (Resource Query Language) expresses filters, sorting, grouping and paging
as nested function calls, typically taken from a URL query string.

DOCUMENTATION CATEGORIES

  syntax        Function calls, arguments, and the term tree
  quoting       Quotes, escapes, and delimiters
  operators     The a=b and a=op=b shorthand forms
  functions     Built-in functions and the clause each belongs to
  paging        limit, offset, page, and sort keys
  validation    Which tokens are accepted as column names

QUICK REFERENCE

  eq(col,value)             Function call
  and(eq(a,1),gt(b,2))      Nested calls
  'a,b'  "x y"              Quoted literal (quotes kept)
  a\,b                      Escaped delimiter
  col=value  col=gt=10      Operator shorthand

Run 'rql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Quoting) => Ok(QUOTING_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Paging) => Ok(PAGING_DOC),
        Some(DocCategory::Validation) => Ok(VALIDATION_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Function Calls and Terms

FUNCTION CALLS
  name(arg1,arg2,...)
    A name immediately followed by '(' opens a call. Arguments run until the
    matching ')'. Arguments are leaves or further calls.

    Example:
      rql parse 'and(eq(a,1),eq(b,2))'
      => and(eq(a,1),eq(b,2))

DELIMITERS
  Commas and whitespace separate arguments. Repeated delimiters collapse:
      f(,,,,a, , , , b)   =>   f(a,b)

TOP LEVEL
  Several calls may appear side by side; each becomes a root term:
      f(a, b),f(b,c)      =>   f(a,b)  and  f(b,c)

ERRORS
  Unterminated quotes, a trailing backslash, an unclosed call, or a ')' with
  no matching '(' are rejected with the offset of the problem. A '(' with no
  function name in front of it is also rejected.
"#;

const QUOTING_DOC: &str = r#"QUOTING - Quotes, Escapes, and Delimiters

QUOTED LITERALS
  'text'  "text"
    Everything between matching quotes is literal, including commas, spaces
    and parens. The quotes stay in the token, so 'price' (text) and price
    (a column) remain distinct.

      eq(_query, "SELECT * FROM t WHERE x IN ('a','b')")

ESCAPES
  A backslash makes the next character plain data:
      a,b\,c              =>   a   b,c
      fun\(ction(a)       =>   call named 'fun(ction'
  Two backslashes produce one literal backslash.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Shorthand Clauses

  rql parse --operator 'brand=LAYS'
  => eq(brand,LAYS)

  rql parse --operator 'price=gt=10'
  => gt(price,10)

  rql parse --operator 'id=in=(1,2,3)'
  => in(id,1,2,3)

  '=' is only special at top level, outside quotes. Inside calls it is data.
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Built-in Vocabulary

WHERE
  eq ne lt le gt ge       Comparisons: fn(column,value)
  in out                  Membership: in(column,v1,v2,...)
  like w sw ew wo         Pattern, contains, starts-with, ends-with, without
  n nn emp nemp           Null / not null / empty / not empty
  and or not              Logical combinations of the above
  _key                    Reserved key lookup

SELECT
  includes excludes distinct count sum min max as func aggregate

GROUP
  group(col1,col2)

ORDER
  sort(-price,name)  order(price,desc)

PAGE
  page pagenum pagesize limit offset after

Extra functions can be registered with --function name=kind.
"#;

const PAGING_DOC: &str = r#"PAGING - Limits, Offsets, and Sort Keys

  limit(10)           10 rows
  limit(10,40)        10 rows, skip 40
  offset(40)          skip 40
  page(3,25)          page 3 of 25 rows (skip 50)
  pagenum(3) pagesize(25)
  after('cursor')     keyset cursor

  sort(-price,+name)  price descending, name ascending
  order(price,desc)   trailing direction applies to the previous column
"#;

const VALIDATION_DOC: &str = r#"VALIDATION - Column Names

  Column references must match [A-Za-z0-9_]+ and must not start with '_'.
  Underscore-prefixed tokens such as _query are reserved.

  rql check 'eq(column_name,1)'     valid
  rql check 'eq(_column,1)'         rejected
  rql check 'eq(col-umn,1)'         rejected

  The column is the first argument of comparison functions, every argument
  of group(), sort() and order(), and every argument of includes()/excludes().
"#;
